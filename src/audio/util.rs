//! Shared audio helpers: device selection, mixdown, WAV encoding.

use std::io::Cursor;

use anyhow::Result;
use cpal::traits::DeviceTrait;
use cpal::{Device, SampleFormat, SupportedStreamConfig, SupportedStreamConfigRange};
use hound::{SampleFormat as WavSampleFormat, WavSpec, WavWriter};

/// Get a human-readable device name, or "Unknown" if the name cannot be
/// retrieved.
pub fn device_name(device: &Device) -> String {
    device.description().ok().map(|desc| desc.name().to_string()).unwrap_or_else(|| "Unknown".to_string())
}

/// Find the best matching input configuration.
///
/// Only mono or stereo F32 configurations are considered (universally
/// supported on modern hardware). Prefers the target sample rate; when the
/// device cannot do it, clamps to the closest rate it offers, so callers
/// must label captured audio with the returned config's actual rate.
pub fn find_best_config(configs: impl Iterator<Item = SupportedStreamConfigRange>, target_sample_rate: u32) -> Result<SupportedStreamConfig> {
    let f32_configs: Vec<SupportedStreamConfigRange> =
        configs.filter(|config| config.channels() <= 2 && config.sample_format() == SampleFormat::F32).collect();

    if f32_configs.is_empty() {
        anyhow::bail!("No F32 audio configuration found - this is unexpected on modern hardware");
    }

    for config in &f32_configs {
        if target_sample_rate >= config.min_sample_rate() && target_sample_rate <= config.max_sample_rate() {
            return Ok((*config).with_sample_rate(target_sample_rate));
        }
    }

    // No exact match: clamp to the closest supported rate
    let config = &f32_configs[0];
    let rate = if target_sample_rate < config.min_sample_rate() {
        config.min_sample_rate()
    } else {
        config.max_sample_rate()
    };
    Ok((*config).with_sample_rate(rate))
}

/// Mix interleaved f32 samples down to mono by averaging channels.
pub fn mix_to_mono(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        data.to_vec()
    } else {
        data.chunks(channels).map(|frame| frame.iter().sum::<f32>() / channels as f32).collect()
    }
}

/// Encode mono f32 samples as an in-memory 16-bit PCM WAV.
///
/// This is the upload format the transcription service expects; samples
/// are clamped to [-1, 1] before conversion.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: WavSampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut buffer, spec)?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(buffer.into_inner())
}
