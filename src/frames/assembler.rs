//! Animation assembly: encodes a frame sequence into one looping GIF.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gif::{Encoder, Frame, Repeat};
use image::RgbaImage;
use image::imageops::FilterType;
use tracing::debug;

use super::sequence::FrameSequence;

/// Display time for every output frame, in milliseconds.
pub const FRAME_DURATION_MS: u16 = 500;

/// GIF frame delays are expressed in centiseconds.
const FRAME_DELAY_CS: u16 = FRAME_DURATION_MS / 10;

/// Palette quantization speed for the `gif` crate (1 best, 30 fastest).
const QUANTIZATION_SPEED: i32 = 10;

/// Largest canvas side the GIF format can address.
const MAX_CANVAS_PX: u32 = u16::MAX as u32;

/// Encode `sequence` and write it to `path`, replacing any existing file.
///
/// Returns the output path, or `None` when the sequence is empty and
/// nothing was written.
///
/// # Errors
/// Fails on encode or filesystem errors, and when the canvas exceeds the
/// GIF size limit.
pub fn assemble(sequence: &FrameSequence, path: &Path) -> Result<Option<PathBuf>> {
    if sequence.is_empty() {
        return Ok(None);
    }

    let data = encode_gif(sequence)?;
    fs::write(path, &data).with_context(|| format!("writing {}", path.display()))?;
    debug!("Wrote {} frame(s), {} bytes", sequence.len(), data.len());
    Ok(Some(path.to_path_buf()))
}

/// Encode all frames into an in-memory GIF that loops forever.
///
/// The first frame sets the canvas; later frames with other dimensions are
/// resized to fit.
fn encode_gif(sequence: &FrameSequence) -> Result<Vec<u8>> {
    let (width, height) = sequence.canvas().context("empty frame sequence")?;
    if width > MAX_CANVAS_PX || height > MAX_CANVAS_PX {
        anyhow::bail!("canvas {}x{} exceeds the GIF limit of {} px per side", width, height, MAX_CANVAS_PX);
    }

    let mut data = Vec::new();
    {
        let mut encoder = Encoder::new(&mut data, width as u16, height as u16, &[])
            .context("creating GIF encoder")?;
        encoder.set_repeat(Repeat::Infinite).context("setting GIF loop flag")?;

        for frame in sequence.frames() {
            let mut rgba = fit_to_canvas(frame, width, height);
            let mut gif_frame =
                Frame::from_rgba_speed(width as u16, height as u16, &mut rgba, QUANTIZATION_SPEED);
            gif_frame.delay = FRAME_DELAY_CS;
            encoder.write_frame(&gif_frame).context("writing GIF frame")?;
        }
    }
    Ok(data)
}

/// Raw RGBA bytes for `frame`, resized to the canvas when needed.
fn fit_to_canvas(frame: &RgbaImage, width: u32, height: u32) -> Vec<u8> {
    if frame.dimensions() == (width, height) {
        return frame.as_raw().clone();
    }
    image::DynamicImage::ImageRgba8(frame.clone())
        .resize_exact(width, height, FilterType::Triangle)
        .into_rgba8()
        .into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};
    use std::io::Cursor;

    fn sequence_of(dimensions: &[(u32, u32)]) -> FrameSequence {
        let mut sequence = FrameSequence::new();
        for &(w, h) in dimensions {
            sequence.push(RgbaImage::from_pixel(w, h, Rgba([200, 40, 40, 255])));
        }
        sequence
    }

    fn decode(path: &Path) -> Vec<image::Frame> {
        let data = fs::read(path).unwrap();
        let decoder = GifDecoder::new(Cursor::new(data)).unwrap();
        decoder.into_frames().collect_frames().unwrap()
    }

    #[test]
    fn test_empty_sequence_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");

        let result = assemble(&FrameSequence::new(), &path).unwrap();
        assert!(result.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_artifact_is_a_gif_with_all_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");

        let written = assemble(&sequence_of(&[(8, 8), (8, 8), (8, 8)]), &path).unwrap();
        assert_eq!(written, Some(path.clone()));

        let data = fs::read(&path).unwrap();
        assert_eq!(&data[0..6], b"GIF89a");
        assert_eq!(decode(&path).len(), 3);
    }

    #[test]
    fn test_frames_hold_for_half_a_second() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        assemble(&sequence_of(&[(8, 8)]), &path).unwrap();

        let frames = decode(&path);
        let (numer, denom) = frames[0].delay().numer_denom_ms();
        assert_eq!(numer / denom, 500);
    }

    #[test]
    fn test_artifact_loops_forever() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        assemble(&sequence_of(&[(8, 8)]), &path).unwrap();

        let data = fs::read(&path).unwrap();
        assert!(data.windows(11).any(|w| w == b"NETSCAPE2.0"));
    }

    #[test]
    fn test_first_frame_sets_the_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        assemble(&sequence_of(&[(8, 8), (16, 16)]), &path).unwrap();

        let frames = decode(&path);
        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert_eq!(frame.buffer().dimensions(), (8, 8));
        }
    }

    #[test]
    fn test_oversized_canvas_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");

        let result = assemble(&sequence_of(&[(70_000, 1)]), &path);
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_artifact_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        fs::write(&path, b"stale").unwrap();

        assemble(&sequence_of(&[(8, 8)]), &path).unwrap();
        assert_eq!(decode(&path).len(), 1);
    }
}
