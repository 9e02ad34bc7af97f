//! TTS (Text-to-Speech) adapter backed by Replicate.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::types::{ProviderOutput, RequestDescriptor, SpeechRecord, VoiceConfig, VoiceOverrides};
use crate::cache::{get_audio_basename, JsonIndexCache, SpeechCache};
use crate::config::{Settings, API_TOKEN_ENV, DEFAULT_CACHE_DIR};
use crate::drivers::replicate::{DEFAULT_API_BASE, DEFAULT_POLL_INTERVAL};
use crate::drivers::{ReplicateDriver, SpeechProvider};
use crate::transport::HttpTransport;
use crate::utils::remove_bookmarks;
use crate::{Error, ErrorContext, Result};

/// Extension of audio files named from a fingerprint.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Synthesizes speech through a hosted model and keeps the audio in a cache
/// directory.
pub struct ReplicateService {
    config: VoiceConfig,
    cache_dir: PathBuf,
    api_token_env: String,
    provider: Arc<dyn SpeechProvider>,
    cache: Arc<dyn SpeechCache>,
    transport: HttpTransport,
}

impl std::fmt::Debug for ReplicateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateService")
            .field("config", &self.config)
            .field("cache_dir", &self.cache_dir)
            .field("provider", &self.provider)
            .field("cache", &self.cache.name())
            .finish()
    }
}

impl ReplicateService {
    pub fn builder() -> ReplicateServiceBuilder {
        ReplicateServiceBuilder::new()
    }

    pub fn new(config: VoiceConfig, cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder().config(config).cache_dir(cache_dir).build()
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::builder()
            .config(settings.voice.clone())
            .cache_dir(settings.cache_dir.clone())
            .api_base(settings.api_base.clone())
            .api_token_env(settings.api_token_env.clone())
            .poll_interval(settings.poll_interval())
            .build()
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Produce (or reuse) the audio for `text`.
    ///
    /// `cache_dir` defaults to the adapter's own directory. `path` is the audio
    /// file relative to it; when absent the name is derived from the request
    /// fingerprint. A cache hit returns the stored record without touching the
    /// network.
    pub fn generate_from_text(
        &self,
        text: &str,
        cache_dir: Option<&Path>,
        path: Option<&str>,
        overrides: &VoiceOverrides,
    ) -> Result<SpeechRecord> {
        if let Some(p) = path {
            check_relative_audio_path(p)?;
        }
        let cache_dir = cache_dir.unwrap_or(self.cache_dir.as_path());
        let config = self.config.merge(overrides);
        let input_text = remove_bookmarks(text);
        let descriptor = RequestDescriptor::new(input_text, config);

        if let Some(cached) = self.cache.lookup(&descriptor, cache_dir)? {
            return Ok(cached);
        }

        let audio_path = match path {
            Some(p) => p.to_string(),
            None => format!("{}.{}", get_audio_basename(&descriptor)?, AUDIO_EXTENSION),
        };

        let token = env::var(&self.api_token_env)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::MissingCredential {
                var: self.api_token_env.clone(),
            })?;

        let input = descriptor.config.provider_input(&descriptor.input_text);
        debug!(
            provider = self.provider.provider_id(),
            model = %descriptor.config.model,
            "running synthesis"
        );
        let output = self.provider.run(&descriptor.config.model, &input, &token)?;

        let audio_url = ProviderOutput::classify(output).into_audio_url()?;

        self.transport
            .download_to_file(&audio_url, &cache_dir.join(&audio_path))?;

        Ok(SpeechRecord {
            input_text: text.to_string(),
            input_data: descriptor,
            original_audio: audio_path,
        })
    }

    /// [`generate_from_text`](Self::generate_from_text) against the adapter's
    /// cache directory, recording the result in the cache index.
    pub fn synthesize(
        &self,
        text: &str,
        path: Option<&str>,
        overrides: &VoiceOverrides,
    ) -> Result<SpeechRecord> {
        let record = self.generate_from_text(text, None, path, overrides)?;
        self.cache.store(&record, &self.cache_dir)?;
        Ok(record)
    }
}

/// `path` must stay inside the cache directory: no root, drive prefix or `..`.
fn check_relative_audio_path(path: &str) -> Result<()> {
    let escapes = Path::new(path).components().any(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    let has_file = Path::new(path)
        .components()
        .any(|c| matches!(c, Component::Normal(_)));
    if escapes || !has_file {
        return Err(Error::validation_with_context(
            format!("audio path '{}' must be relative to the cache directory", path),
            ErrorContext::new()
                .with_field_path("path")
                .with_source("tts"),
        ));
    }
    Ok(())
}

pub struct ReplicateServiceBuilder {
    config: VoiceConfig,
    cache_dir: PathBuf,
    api_base: String,
    api_token_env: String,
    poll_interval: Duration,
    provider: Option<Arc<dyn SpeechProvider>>,
    cache: Option<Arc<dyn SpeechCache>>,
}

impl ReplicateServiceBuilder {
    pub fn new() -> Self {
        Self {
            config: VoiceConfig::default(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            api_base: DEFAULT_API_BASE.to_string(),
            api_token_env: API_TOKEN_ENV.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            provider: None,
            cache: None,
        }
    }
    pub fn config(mut self, config: VoiceConfig) -> Self {
        self.config = config;
        self
    }
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }
    pub fn api_token_env(mut self, var: impl Into<String>) -> Self {
        self.api_token_env = var.into();
        self
    }
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
    /// Replace the Replicate HTTP driver.
    pub fn provider(mut self, provider: Arc<dyn SpeechProvider>) -> Self {
        self.provider = Some(provider);
        self
    }
    /// Replace the `cache.json` index.
    pub fn cache(mut self, cache: Arc<dyn SpeechCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<ReplicateService> {
        if self.api_token_env.trim().is_empty() {
            return Err(Error::configuration("API token variable name must not be empty"));
        }
        let transport = HttpTransport::new()?;
        let provider: Arc<dyn SpeechProvider> = match self.provider {
            Some(p) => p,
            None => Arc::new(
                ReplicateDriver::new(transport.clone())
                    .with_api_base(self.api_base)
                    .with_poll_interval(self.poll_interval),
            ),
        };
        let cache: Arc<dyn SpeechCache> = self
            .cache
            .unwrap_or_else(|| Arc::new(JsonIndexCache::new()) as Arc<dyn SpeechCache>);
        fs::create_dir_all(&self.cache_dir)?;
        Ok(ReplicateService {
            config: self.config,
            cache_dir: self.cache_dir,
            api_token_env: self.api_token_env,
            provider,
            cache,
            transport,
        })
    }
}

impl Default for ReplicateServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
