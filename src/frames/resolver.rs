//! Frame resolution: maps input symbols to decoded asset frames.
//!
//! Letters contribute every frame of their GIF in order; digits contribute
//! repeated copies of their static image so each one stays on screen for a
//! readable beat. Symbols without a usable asset are skipped with a
//! diagnostic and never abort the run.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, RgbaImage};
use tracing::debug;

use super::assets::AssetLibrary;
use super::sequence::{FrameSequence, Symbol};
use crate::report::Report;

/// Copies of a digit's static image appended per digit.
const DIGIT_FRAME_REPEAT: usize = 5;

/// Largest still side that fits a GIF canvas. Letter assets are GIFs and
/// can never exceed this; digit PNGs can.
const MAX_STILL_PX: u32 = u16::MAX as u32;

/// Resolve a transcript into letter frames.
///
/// Case-insensitive: `a` and `A` use the same asset. Every non-letter
/// character is skipped with an informational diagnostic.
pub fn resolve_text(text: &str, assets: &AssetLibrary, report: &mut Report) -> FrameSequence {
    let mut sequence = FrameSequence::new();

    for raw in text.chars() {
        match Symbol::classify(raw) {
            Symbol::Letter(letter) => match assets.lookup(letter) {
                Some(path) => match decode_gif_frames(&path) {
                    Ok(frames) => {
                        debug!("'{}' contributed {} frame(s)", letter, frames.len());
                        for frame in frames {
                            sequence.push(frame);
                        }
                    }
                    Err(e) => report.error(format!(
                        "Undecodable asset for '{}' at {}: {:#}",
                        letter,
                        path.display(),
                        e
                    )),
                },
                None => report.warn(format!(
                    "No asset for letter '{}' at {}",
                    letter,
                    assets.path_for(letter).display()
                )),
            },
            Symbol::Digit(_) | Symbol::Ignored(_) => {
                report.info(format!("Skipping non-letter character '{}'", raw));
            }
        }
    }

    sequence
}

/// Resolve a digit string into frames.
///
/// Each digit with an asset contributes [`DIGIT_FRAME_REPEAT`] copies of
/// its image; every non-digit character is skipped with a diagnostic, as
/// is any still too large for a GIF canvas.
pub fn resolve_digits(text: &str, assets: &AssetLibrary, report: &mut Report) -> FrameSequence {
    let mut sequence = FrameSequence::new();

    for raw in text.chars() {
        match Symbol::classify(raw) {
            Symbol::Digit(digit) => match assets.lookup(digit) {
                Some(path) => match decode_still(&path) {
                    Ok(image) if image.width() > MAX_STILL_PX || image.height() > MAX_STILL_PX => {
                        report.error(format!(
                            "Oversized asset for '{}' at {}: {}x{} exceeds the {} px GIF limit",
                            digit,
                            path.display(),
                            image.width(),
                            image.height(),
                            MAX_STILL_PX
                        ));
                    }
                    Ok(image) => {
                        debug!("'{}' contributed {} frame(s)", digit, DIGIT_FRAME_REPEAT);
                        for _ in 0..DIGIT_FRAME_REPEAT {
                            sequence.push(image.clone());
                        }
                    }
                    Err(e) => report.error(format!(
                        "Undecodable asset for '{}' at {}: {:#}",
                        digit,
                        path.display(),
                        e
                    )),
                },
                None => report.warn(format!(
                    "No asset for digit '{}' at {}",
                    digit,
                    assets.path_for(digit).display()
                )),
            },
            Symbol::Letter(_) | Symbol::Ignored(_) => {
                report.info(format!("Skipping non-digit character '{}'", raw));
            }
        }
    }

    sequence
}

/// Decode every frame of an animated GIF asset, in order.
fn decode_gif_frames(path: &Path) -> Result<Vec<RgbaImage>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let decoder = GifDecoder::new(BufReader::new(file)).context("reading GIF header")?;
    let frames = decoder.into_frames().collect_frames().context("decoding GIF frames")?;
    Ok(frames.into_iter().map(|frame| frame.into_buffer()).collect())
}

/// Decode a static digit image.
fn decode_still(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    Ok(image.to_rgba8())
}
