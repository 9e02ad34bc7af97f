//! replicate-tts — synthesize one text into a voice-over cache directory
//!
//! Usage:
//!   replicate-tts [--config settings.yaml] [--cache-dir DIR] [--output out.mp3] "Hello"

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use replicate_voiceover::config::{load_dotenv, Settings};
use replicate_voiceover::{ReplicateService, VoiceOverrides};

#[derive(Parser, Debug)]
#[command(name = "replicate-tts")]
#[command(version, about = "Synthesize speech with a Replicate model and cache the audio")]
struct Cli {
    /// Text to synthesize (bookmark tags are stripped before sending)
    text: String,

    /// Settings file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Cache directory (overrides settings and VOICEOVER_CACHE_DIR)
    #[arg(long = "cache-dir", value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Audio path relative to the cache directory
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<String>,

    #[arg(long)]
    voice_id: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pitch: Option<i32>,
    #[arg(long)]
    speed: Option<f64>,
    #[arg(long)]
    volume: Option<f64>,
    #[arg(long)]
    emotion: Option<String>,
    #[arg(long)]
    language_boost: Option<String>,
}

impl Cli {
    fn overrides(&self) -> VoiceOverrides {
        VoiceOverrides {
            voice_id: self.voice_id.clone(),
            pitch: self.pitch,
            speed: self.speed,
            volume: self.volume,
            emotion: self.emotion.clone(),
            language_boost: self.language_boost.clone(),
            ..VoiceOverrides::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_yaml_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?
            .apply_env(),
        None => Settings::from_env(),
    };
    if let Some(dir) = &cli.cache_dir {
        settings.cache_dir = dir.clone();
    }

    let service = ReplicateService::from_settings(&settings)?;
    let record = service
        .synthesize(&cli.text, cli.output.as_deref(), &cli.overrides())
        .context("synthesis failed")?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
