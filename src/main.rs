//! ASL Converter: speech to American Sign Language fingerspelling GIFs.
//!
//! Captures one utterance from the microphone (or takes a transcript on
//! the command line), transcribes it through an external speech service,
//! and renders the result as a looping letter-by-letter or digit-by-digit
//! fingerspelling animation.

mod audio;
mod config;
mod frames;
mod numbers;
mod pipeline;
mod report;
mod stt;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use crate::config::AppConfig;
use crate::frames::AssetLibrary;

fn main() -> Result<()> {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Initialize logging with time-only format
    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🤟 ASL Converter v{}", env!("CARGO_PKG_VERSION"));

    if config.list_assets {
        frames::print_inventory(&AssetLibrary::letters(&config.letter_dir), &AssetLibrary::digits(&config.digit_dir));
        return Ok(());
    }

    // clap enforces the mode whenever --list-assets is absent
    let Some(mode) = config.mode else {
        error!("❌ No conversion mode given");
        std::process::exit(2);
    };

    // Validate configuration
    if let Err(e) = config.validate(mode) {
        error!("❌ Configuration error: {}", e);
        std::process::exit(1);
    }

    config.log_config(mode);

    match mode {
        config::Mode::Text => pipeline::run_text(&config),
        config::Mode::Number => pipeline::run_number(&config),
    }
}
