//! Application configuration and CLI argument parsing.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which conversion an invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Spell the transcript letter by letter (A-Z assets)
    Text,
    /// Render a spoken number digit by digit (0-9 assets)
    Number,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Text => write!(f, "text"),
            Mode::Number => write!(f, "number"),
        }
    }
}

/// ASL converter application configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "asl-converter")]
#[command(author, version, about = "Convert speech to ASL fingerspelling animations", long_about = None)]
pub struct AppConfig {
    /// Conversion to perform
    #[arg(value_enum, required_unless_present = "list_assets")]
    pub mode: Option<Mode>,

    /// List available letter and digit assets, then exit
    #[arg(long)]
    pub list_assets: bool,

    /// Use this transcript instead of capturing speech
    #[arg(long, short = 't')]
    pub transcript: Option<String>,

    /// Directory holding per-letter GIF assets (A.gif .. Z.gif)
    #[arg(long, env = "ASL_LETTER_DIR", default_value = "asl_gifs")]
    pub letter_dir: PathBuf,

    /// Directory holding per-digit PNG assets (0.png .. 9.png)
    #[arg(long, env = "ASL_DIGIT_DIR", default_value = "asl_blender")]
    pub digit_dir: PathBuf,

    /// Output GIF path (default depends on the mode)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Requested capture sample rate in Hz (the device may clamp it)
    #[arg(long, default_value = "16000")]
    pub sample_rate: u32,

    /// Seconds to wait for speech to start before giving up
    #[arg(long, default_value = "10")]
    pub listen_timeout: f32,

    /// Maximum seconds of speech per utterance (default: 5 for text, 3 for number)
    #[arg(long)]
    pub phrase_time_limit: Option<f32>,

    /// RMS level treated as speech (0.0 - 1.0)
    #[arg(long, default_value = "0.01")]
    pub energy_threshold: f32,

    /// Seconds of silence that end an utterance
    #[arg(long, default_value = "0.8")]
    pub pause_threshold: f32,

    /// Transcription endpoint (OpenAI-compatible)
    #[arg(long, env = "STT_ENDPOINT", default_value = "https://api.openai.com/v1/audio/transcriptions")]
    pub stt_endpoint: String,

    /// Transcription model name
    #[arg(long, env = "STT_MODEL", default_value = "whisper-1")]
    pub stt_model: String,

    /// API key for the transcription service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub stt_api_key: Option<String>,

    /// Language hint for transcription (e.g. en, es); "auto" lets the service detect
    #[arg(long, default_value = "en")]
    pub stt_language: String,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Phrase time limit for `mode`: the flag when given, otherwise the
    /// mode's default (5 s of spelled text, 3 s for a number).
    pub fn effective_phrase_limit(&self, mode: Mode) -> f32 {
        self.phrase_time_limit.unwrap_or(match mode {
            Mode::Text => 5.0,
            Mode::Number => 3.0,
        })
    }

    /// Output artifact path for `mode`.
    pub fn effective_output(&self, mode: Mode) -> PathBuf {
        self.output.clone().unwrap_or_else(|| match mode {
            Mode::Text => PathBuf::from("asl_output.gif"),
            Mode::Number => PathBuf::from("asl_number_output.gif"),
        })
    }

    /// Language hint for the transcription request; `None` asks the
    /// service to auto-detect.
    pub fn effective_stt_language(&self) -> Option<&str> {
        if self.stt_language.eq_ignore_ascii_case("auto") {
            None
        } else {
            Some(&self.stt_language)
        }
    }

    /// Asset directory used by `mode`.
    pub fn asset_dir(&self, mode: Mode) -> &Path {
        match mode {
            Mode::Text => &self.letter_dir,
            Mode::Number => &self.digit_dir,
        }
    }

    /// Validate the configuration for a run in `mode`.
    ///
    /// # Errors
    /// Returns an error for a missing asset directory, a missing API key
    /// when capture is needed, or out-of-range capture parameters.
    pub fn validate(&self, mode: Mode) -> Result<()> {
        let dir = self.asset_dir(mode);
        if !dir.is_dir() {
            anyhow::bail!("Asset directory does not exist: {}", dir.display());
        }

        if self.transcript.is_none() && self.stt_api_key.is_none() {
            anyhow::bail!("No STT API key configured; set --stt-api-key / OPENAI_API_KEY or pass --transcript");
        }

        // Duration::from_secs_f32 panics on NaN and out-of-range input;
        // these bounds reject both (NaN fails every comparison)
        if !(self.listen_timeout > 0.0 && self.listen_timeout <= 3600.0) {
            anyhow::bail!("Listen timeout must be between 0 and 3600 seconds");
        }

        if let Some(limit) = self.phrase_time_limit
            && !(limit > 0.0 && limit <= 600.0)
        {
            anyhow::bail!("Phrase time limit must be between 0 and 600 seconds");
        }

        if !(0.0..=1.0).contains(&self.energy_threshold) {
            anyhow::bail!("Energy threshold must be between 0.0 and 1.0");
        }

        if !(self.pause_threshold > 0.0 && self.pause_threshold <= 60.0) {
            anyhow::bail!("Pause threshold must be between 0 and 60 seconds");
        }

        if self.sample_rate == 0 {
            anyhow::bail!("Sample rate must be positive");
        }

        Ok(())
    }

    /// Log the effective configuration for a run in `mode`.
    pub fn log_config(&self, mode: Mode) {
        info!("Configuration:");
        info!("  Mode: {}", mode);
        info!("  Asset directory: {}", self.asset_dir(mode).display());
        info!("  Output: {}", self.effective_output(mode).display());

        if self.transcript.is_some() {
            info!("  Transcript: provided on the command line, capture skipped");
        } else {
            info!("  Sample rate: {} Hz (requested)", self.sample_rate);
            info!("  Listen timeout: {}s", self.listen_timeout);
            info!("  Phrase time limit: {}s", self.effective_phrase_limit(mode));
            info!("  Energy threshold: {}", self.energy_threshold);
            info!("  Pause threshold: {}s", self.pause_threshold);
            info!("  STT endpoint: {}", self.stt_endpoint);
            info!("  STT model: {}", self.stt_model);
            info!("  STT language: {}", self.effective_stt_language().unwrap_or("auto"));
        }
    }
}
