//! Speech-to-text via an external transcription service.

mod client;

pub use client::{CaptureFailure, Recognizer};
