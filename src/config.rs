//! Settings loading.
//!
//! Nothing here runs implicitly: the process calls [`load_dotenv`] and builds a
//! [`Settings`] at startup, then hands it to
//! [`ReplicateService::from_settings`](crate::tts::ReplicateService::from_settings).

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::drivers::replicate::DEFAULT_API_BASE;
use crate::tts::VoiceConfig;
use crate::{Error, ErrorContext, Result};

/// Credential variable read before every provider call.
pub const API_TOKEN_ENV: &str = "REPLICATE_API_TOKEN";
pub const API_BASE_ENV: &str = "REPLICATE_API_BASE";
pub const CACHE_DIR_ENV: &str = "VOICEOVER_CACHE_DIR";

pub const DEFAULT_CACHE_DIR: &str = "media/voiceovers";

/// Load the nearest `.env` (current directory, then parents) into the process
/// environment. Variables already set win. Returns the file that was loaded.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            Some(path)
        }
        Err(e) => {
            debug!(error = %e, "no .env loaded");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub api_base: String,
    /// Name of the environment variable holding the API token.
    pub api_token_env: String,
    pub poll_interval_ms: u64,
    pub voice: VoiceConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            api_base: DEFAULT_API_BASE.to_string(),
            api_token_env: API_TOKEN_ENV.to_string(),
            poll_interval_ms: 500,
            voice: VoiceConfig::default(),
        }
    }
}

impl Settings {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Read a YAML settings file; missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read settings file: {}", e),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("settings"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Layer `REPLICATE_API_BASE` and `VOICEOVER_CACHE_DIR` over these values.
    pub fn apply_env(mut self) -> Self {
        if let Some(base) = non_empty_var(API_BASE_ENV) {
            self.api_base = base;
        }
        if let Some(dir) = non_empty_var(CACHE_DIR_ENV) {
            self.cache_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
