//! wavloop - Main entry point
//!
//! Opens a WAV file, validates its header, and streams its samples to the
//! audio device in a cooperative polling loop, looping the file forever.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wavloop::audio::CpalSink;
use wavloop::config::TomlConfig;
use wavloop::{Error, PlaybackEngine};

/// Command-line arguments for wavloop
#[derive(Parser, Debug)]
#[command(name = "wavloop")]
#[command(about = "Looping WAV player streaming PCM to the audio device")]
#[command(version)]
struct Args {
    /// WAV file to play (8/16-bit PCM, mono or stereo)
    file: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, env = "WAVLOOP_CONFIG")]
    config: Option<PathBuf>,

    /// Audio output device name (overrides config)
    #[arg(short, long)]
    device: Option<String>,

    /// Bytes per storage read (overrides config)
    #[arg(long)]
    chunk_bytes: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => TomlConfig::load(path)?,
        None => TomlConfig::default(),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("wavloop={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let chunk_bytes = args.chunk_bytes.unwrap_or(config.chunk_bytes);
    let device = args.device.or(config.device);

    info!("Playing {} (chunk size {} bytes)", args.file.display(), chunk_bytes);

    let file = std::fs::File::open(&args.file).map_err(|source| Error::StorageOpen {
        path: args.file.clone(),
        source,
    })?;

    let sink = CpalSink::new(device, Some(config.sink_buffer_bytes))?;

    let mut engine = PlaybackEngine::new(file, sink, chunk_bytes)
        .with_context(|| format!("Cannot play {}", args.file.display()))?;

    // Cooperative polling loop: each step performs one bounded I/O
    // operation, so other work could be interleaved here. Runs until the
    // first streaming error; stopping is ctrl-c.
    loop {
        engine.step().context("Playback failed")?;
    }
}
