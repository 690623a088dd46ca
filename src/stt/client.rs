//! Speech-to-text service client.
//!
//! Posts one captured utterance to an OpenAI-compatible transcription
//! endpoint as a WAV upload and pulls the transcript out of the JSON
//! response. The service is an opaque capability; nothing model-shaped
//! lives on this side of the boundary.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::audio::util::encode_wav;
use crate::config::AppConfig;

/// Why no transcript was produced.
///
/// One taxonomy across the capture boundary: the pipeline reports these
/// the same way whether the microphone, the network, or the service is at
/// fault, and writes nothing.
#[derive(Debug, Error)]
pub enum CaptureFailure {
    #[error("no speech detected before the listening timeout")]
    NoSpeech,
    #[error("could not understand the audio")]
    Unintelligible,
    #[error("speech service request failed: {0}")]
    Service(String),
    #[error("audio capture failed: {0}")]
    Device(String),
}

/// HTTP budget for one transcription call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the transcription service.
pub struct Recognizer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    language: Option<String>, // None requests service-side detection
}

impl Recognizer {
    /// Create a recognizer from the application configuration.
    ///
    /// # Errors
    /// Returns an error when no API key is configured or the HTTP client
    /// cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .stt_api_key
            .clone()
            .context("No STT API key configured (set --stt-api-key or OPENAI_API_KEY)")?;

        info!("Using speech service at {}", config.stt_endpoint);
        info!("Transcription model: {}", config.stt_model);

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.stt_endpoint.clone(),
            model: config.stt_model.clone(),
            api_key,
            language: config.effective_stt_language().map(str::to_string),
        })
    }

    /// Transcribe one utterance.
    ///
    /// # Errors
    /// [`CaptureFailure::Service`] on transport or HTTP errors,
    /// [`CaptureFailure::Unintelligible`] when the service returns no
    /// usable text.
    pub fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String, CaptureFailure> {
        let wav = encode_wav(samples, sample_rate).map_err(|e| CaptureFailure::Service(format!("WAV encoding failed: {e}")))?;
        debug!("Uploading {} bytes of audio", wav.len());

        let part = Part::bytes(wav)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| CaptureFailure::Service(e.to_string()))?;
        let mut form = Form::new().text("model", self.model.clone()).part("file", part);
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| CaptureFailure::Service(e.to_string()))?;

        let payload: Value = response.json().map_err(|e| CaptureFailure::Service(e.to_string()))?;
        extract_transcript(&payload).ok_or(CaptureFailure::Unintelligible)
    }
}

/// Pull the transcript text out of a service response.
fn extract_transcript(payload: &Value) -> Option<String> {
    let text = payload.get("text")?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}
