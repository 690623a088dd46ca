//! The two conversion actions: capture, transform, artifact.
//!
//! Each run is capture (or a supplied transcript), normalization, frame
//! resolution, and GIF assembly. A failed capture ends the run with a
//! report and no artifact; it is an outcome, not a crash.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::audio::Recorder;
use crate::config::{AppConfig, Mode};
use crate::frames::{self, AssetLibrary};
use crate::numbers;
use crate::report::Report;
use crate::stt::{CaptureFailure, Recognizer};

/// Run the letter-spelling conversion.
pub fn run_text(config: &AppConfig) -> Result<()> {
    let transcript = obtain_transcript(config, Mode::Text)?;
    process_text(transcript, config)
}

/// Run the spoken-number conversion.
pub fn run_number(config: &AppConfig) -> Result<()> {
    let transcript = obtain_transcript(config, Mode::Number)?;
    process_number(transcript, config)
}

/// Letter pipeline for an already-obtained transcript.
///
/// `None` means capture produced nothing usable; the run ends without
/// touching the asset library or the output path.
fn process_text(transcript: Option<String>, config: &AppConfig) -> Result<()> {
    let Some(transcript) = transcript else {
        return Ok(());
    };
    info!("🗣️ Recognized: \"{}\"", transcript);

    let assets = AssetLibrary::letters(&config.letter_dir);
    let output = config.effective_output(Mode::Text);
    let mut report = Report::new();

    match convert_text(&transcript, &assets, &output, &mut report)? {
        Some(path) => info!("✅ ASL animation written to {}", path.display()),
        None => warn!("Nothing to render: no letter assets matched the input"),
    }
    log_summary(&report);
    Ok(())
}

/// Digit pipeline for an already-obtained transcript.
fn process_number(transcript: Option<String>, config: &AppConfig) -> Result<()> {
    let Some(transcript) = transcript else {
        return Ok(());
    };
    info!("🗣️ Recognized: \"{}\"", transcript);

    let digits = match numbers::to_digit_string(&transcript) {
        Ok(digits) => digits,
        Err(e) => {
            error!("❌ Not a number: {}", e);
            return Ok(());
        }
    };
    info!("🔢 Numeric text: {}", digits);

    let assets = AssetLibrary::digits(&config.digit_dir);
    let output = config.effective_output(Mode::Number);
    let mut report = Report::new();

    match convert_number(&digits, &assets, &output, &mut report)? {
        Some(path) => info!("✅ ASL animation written to {}", path.display()),
        None => warn!("Nothing to render: no digit assets matched the input"),
    }
    log_summary(&report);
    Ok(())
}

/// Resolve and assemble the letter pipeline for one transcript.
///
/// Returns the artifact path, or `None` when nothing was renderable.
pub fn convert_text(transcript: &str, assets: &AssetLibrary, output: &Path, report: &mut Report) -> Result<Option<PathBuf>> {
    let sequence = frames::resolve_text(transcript, assets, report);
    frames::assemble(&sequence, output)
}

/// Resolve and assemble the digit pipeline for one digit string.
pub fn convert_number(digits: &str, assets: &AssetLibrary, output: &Path, report: &mut Report) -> Result<Option<PathBuf>> {
    let sequence = frames::resolve_digits(digits, assets, report);
    frames::assemble(&sequence, output)
}

/// Get the transcript: the `--transcript` flag, or one captured utterance.
///
/// Capture failures are reported here and yield `None`; the run ends
/// without writing anything. Setup failures (no device, no key) propagate.
fn obtain_transcript(config: &AppConfig, mode: Mode) -> Result<Option<String>> {
    if let Some(text) = &config.transcript {
        return Ok(Some(text.clone()));
    }

    let mut recorder = Recorder::new(config)?;
    let recognizer = Recognizer::new(config)?;

    match capture_utterance(&mut recorder, &recognizer, config.effective_phrase_limit(mode)) {
        Ok(text) => Ok(Some(text)),
        Err(failure) => {
            error!("❌ {}", failure);
            Ok(None)
        }
    }
}

/// One capture round: record an utterance, then transcribe it.
fn capture_utterance(recorder: &mut Recorder, recognizer: &Recognizer, phrase_time_limit: f32) -> Result<String, CaptureFailure> {
    let samples = recorder.listen(phrase_time_limit)?;
    info!("Processing speech...");
    recognizer.transcribe(&samples, recorder.sample_rate())
}

/// Log the end-of-run diagnostic summary.
fn log_summary(report: &Report) {
    if let Some(summary) = report.summary() {
        info!("Diagnostics: {}", summary);
        for entry in report.entries() {
            debug!("  [{}] {}", entry.severity, entry.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use clap::Parser;
    use image::{Rgba, RgbaImage};
    use std::fs::{self, File};
    use std::io::Cursor;

    fn config_for(mode: &str, dir_flag: &str, assets_dir: &Path, output: &Path) -> AppConfig {
        AppConfig::try_parse_from([
            "asl-converter",
            mode,
            dir_flag,
            assets_dir.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap()
    }

    fn write_gif(path: &Path, frame_count: usize) {
        let mut file = File::create(path).unwrap();
        let mut encoder = gif::Encoder::new(&mut file, 8, 8, &[]).unwrap();
        for i in 0..frame_count {
            let mut pixels: Vec<u8> = std::iter::repeat_n([(i * 30) as u8, 0, 0, 255], 8 * 8).flatten().collect();
            let frame = gif::Frame::from_rgba_speed(8, 8, &mut pixels, 10);
            encoder.write_frame(&frame).unwrap();
        }
    }

    fn write_png(path: &Path) {
        RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])).save(path).unwrap();
    }

    fn frame_count(path: &Path) -> usize {
        use image::AnimationDecoder;
        let data = fs::read(path).unwrap();
        let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(data)).unwrap();
        decoder.into_frames().collect_frames().unwrap().len()
    }

    #[test]
    fn test_text_conversion_end_to_end() {
        let assets_dir = tempfile::tempdir().unwrap();
        write_gif(&assets_dir.path().join("A.gif"), 3);

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("out.gif");

        let assets = AssetLibrary::letters(assets_dir.path());
        let mut report = Report::new();
        let written = convert_text("AB", &assets, &output, &mut report).unwrap();

        // A contributes its 3 frames, B is missing and skipped
        assert_eq!(written, Some(output.clone()));
        assert_eq!(frame_count(&output), 3);
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_number_conversion_end_to_end() {
        let assets_dir = tempfile::tempdir().unwrap();
        write_png(&assets_dir.path().join("9.png"));

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("out.gif");

        let assets = AssetLibrary::digits(assets_dir.path());
        let mut report = Report::new();
        let written = convert_number("99", &assets, &output, &mut report).unwrap();

        // each digit holds for five frames
        assert_eq!(written, Some(output.clone()));
        assert_eq!(frame_count(&output), 10);
        assert!(report.is_empty());
    }

    #[test]
    fn test_unrenderable_input_writes_no_artifact() {
        let assets_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("out.gif");

        let assets = AssetLibrary::letters(assets_dir.path());
        let mut report = Report::new();
        let written = convert_text("AB", &assets, &output, &mut report).unwrap();

        assert!(written.is_none());
        assert!(!output.exists());
        assert_eq!(report.count(Severity::Warning), 2);
    }

    #[test]
    fn test_missing_transcript_writes_no_artifact() {
        let assets_dir = tempfile::tempdir().unwrap();
        write_gif(&assets_dir.path().join("A.gif"), 2);
        write_png(&assets_dir.path().join("7.png"));

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("out.gif");

        // assets that would render stay untouched when capture came back empty
        let config = config_for("text", "--letter-dir", assets_dir.path(), &output);
        process_text(None, &config).unwrap();
        assert!(!output.exists());

        let config = config_for("number", "--digit-dir", assets_dir.path(), &output);
        process_number(None, &config).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_sentence_keeps_symbol_order_and_reports_skips() {
        let assets_dir = tempfile::tempdir().unwrap();
        write_gif(&assets_dir.path().join("H.gif"), 1);
        write_gif(&assets_dir.path().join("I.gif"), 2);

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("out.gif");

        let assets = AssetLibrary::letters(assets_dir.path());
        let mut report = Report::new();
        let written = convert_text("hi!", &assets, &output, &mut report).unwrap();

        assert!(written.is_some());
        assert_eq!(frame_count(&output), 3);
        assert_eq!(report.count(Severity::Info), 1);
    }
}
