//! Microphone capture for one-shot utterances.
//!
//! Cross-platform input via cpal, windowed-RMS endpointing, and WAV
//! encoding for the transcription upload.

mod capture;
pub mod endpoint;
pub mod util;

pub use capture::Recorder;
