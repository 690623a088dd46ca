//! One-shot microphone capture using cpal.
//!
//! Builds an input stream on the default device, mixes its channels down
//! to mono, and hands chunks to the listening thread over a bounded
//! channel. The stream only delivers audio while a `listen` call is
//! draining it; between calls the callback drops everything.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use tracing::{debug, info};

use super::endpoint::{EndpointState, Endpointer};
use super::util::{device_name, find_best_config, mix_to_mono};
use crate::config::AppConfig;
use crate::stt::CaptureFailure;

/// Extra time past the phrase budget before a silent stream is declared
/// stalled, in seconds.
const STALL_SLACK_SECS: f32 = 2.0;

/// Microphone recorder delivering one utterance per `listen` call.
pub struct Recorder {
    stream: Stream,               // cpal stream (kept alive with the recorder)
    receiver: Receiver<Vec<f32>>, // mono chunks from the audio callback
    running: Arc<AtomicBool>,     // gates the callback while not listening
    sample_rate: u32,             // actual capture rate, may differ from requested
    timeout: Duration,            // wait-for-speech budget
    energy_threshold: f32,
    pause_threshold: f32,
}

impl Recorder {
    /// Open the default input device.
    ///
    /// # Errors
    /// Returns an error if no input device is available, no usable
    /// configuration exists, or the stream cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_input_device().context("No input device available")?;
        info!("Using input device: {}", device_name(&device));

        let supported_configs = device.supported_input_configs().context("Failed to get supported input configs")?;
        let stream_config = find_best_config(supported_configs, config.sample_rate)?;
        let sample_rate = stream_config.sample_rate();
        if sample_rate != config.sample_rate {
            info!("Device capture rate {} Hz (requested {} Hz)", sample_rate, config.sample_rate);
        }

        let channels = stream_config.channels() as usize;
        debug!("Audio capture config: {} Hz, {} channel(s), {:?}", sample_rate, channels, stream_config.sample_format());
        let stream_config: StreamConfig = stream_config.config();

        // Bounded channel for backpressure (64 chunks ~= 2 seconds of audio)
        let (sender, receiver) = mpsc::sync_channel::<Vec<f32>>(64);
        let running = Arc::new(AtomicBool::new(false));
        let running_clone = running.clone();

        let err_fn = |err| {
            tracing::error!("Audio capture error: {}", err);
        };

        // F32 input stream (guaranteed by find_best_config); dropping a
        // chunk when the listener falls behind beats blocking the audio
        // thread.
        let stream = device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if !running_clone.load(Ordering::Relaxed) {
                    return;
                }
                let mono = mix_to_mono(data, channels);
                let _ = sender.try_send(mono);
            },
            err_fn,
            None,
        )?;

        Ok(Self {
            stream,
            receiver,
            running,
            sample_rate,
            timeout: Duration::from_secs_f32(config.listen_timeout),
            energy_threshold: config.energy_threshold,
            pause_threshold: config.pause_threshold,
        })
    }

    /// Actual capture sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Record one utterance.
    ///
    /// Waits up to the configured listen timeout for speech to start,
    /// then records until the pause threshold of silence or
    /// `phrase_time_limit` seconds of audio. Blocks for a bounded time.
    ///
    /// # Errors
    /// [`CaptureFailure::NoSpeech`] when nothing crosses the energy
    /// threshold in time, [`CaptureFailure::Device`] when the stream
    /// fails or stalls.
    pub fn listen(&mut self, phrase_time_limit: f32) -> Result<Vec<f32>, CaptureFailure> {
        self.drain_stale();
        self.running.store(true, Ordering::SeqCst);
        self.stream.play().map_err(|e| CaptureFailure::Device(e.to_string()))?;

        info!("🎤 Listening... speak now");

        let mut endpointer = Endpointer::new(self.sample_rate, self.energy_threshold, self.pause_threshold, phrase_time_limit);
        let wait_deadline = Instant::now() + self.timeout;
        let hard_deadline = wait_deadline + Duration::from_secs_f32(phrase_time_limit + self.pause_threshold + STALL_SLACK_SECS);

        let outcome = loop {
            match self.receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(chunk) => match endpointer.feed(&chunk) {
                    EndpointState::Complete => break Ok(()),
                    EndpointState::Waiting if Instant::now() >= wait_deadline => break Err(CaptureFailure::NoSpeech),
                    EndpointState::Waiting | EndpointState::Recording => {}
                },
                Err(RecvTimeoutError::Timeout) => {
                    if !endpointer.heard_speech() && Instant::now() >= wait_deadline {
                        break Err(CaptureFailure::NoSpeech);
                    }
                    if Instant::now() >= hard_deadline {
                        break Err(CaptureFailure::Device("audio stream stalled".to_string()));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    break Err(CaptureFailure::Device("audio stream closed".to_string()));
                }
            }
        };

        self.running.store(false, Ordering::SeqCst);
        let _ = self.stream.pause();

        outcome?;
        let samples = endpointer.into_samples();
        info!("🎤 Captured {:.1}s of audio", samples.len() as f32 / self.sample_rate as f32);
        Ok(samples)
    }

    /// Discard chunks buffered before this listen call.
    fn drain_stale(&self) {
        while self.receiver.try_recv().is_ok() {}
    }
}
