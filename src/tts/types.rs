//! TTS (Text-to-Speech) types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{Error, Result};

/// Service tag written into every request descriptor.
pub const SERVICE_NAME: &str = "replicate";

pub const DEFAULT_MODEL: &str = "minimax/speech-02-hd";
pub const DEFAULT_VOICE_ID: &str = "Chinese (Mandarin)_Stubborn_Friend";

/// Voice and audio parameters sent to the provider.
///
/// Field order is part of the cache contract: it is the order in which the
/// `config` object of a request descriptor is serialized and fingerprinted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub model: String,
    pub voice_id: String,
    pub pitch: i32,
    pub speed: f64,
    pub volume: f64,
    /// Bits per second.
    pub bitrate: u32,
    pub channel: String,
    pub emotion: String,
    /// Hz.
    pub sample_rate: u32,
    pub language_boost: String,
    pub english_normalization: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            pitch: 0,
            speed: 1.0,
            volume: 1.0,
            bitrate: 128_000,
            channel: "mono".to_string(),
            emotion: "happy".to_string(),
            sample_rate: 32_000,
            language_boost: "Chinese".to_string(),
            english_normalization: true,
        }
    }
}

impl VoiceConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn with_language_boost(mut self, language_boost: impl Into<String>) -> Self {
        self.language_boost = language_boost.into();
        self
    }

    /// Overlay per-call overrides on top of these defaults.
    ///
    /// The model is fixed per adapter instance and cannot be overridden.
    pub fn merge(&self, overrides: &VoiceOverrides) -> VoiceConfig {
        VoiceConfig {
            model: self.model.clone(),
            voice_id: overrides
                .voice_id
                .clone()
                .unwrap_or_else(|| self.voice_id.clone()),
            pitch: overrides.pitch.unwrap_or(self.pitch),
            speed: overrides.speed.unwrap_or(self.speed),
            volume: overrides.volume.unwrap_or(self.volume),
            bitrate: overrides.bitrate.unwrap_or(self.bitrate),
            channel: overrides
                .channel
                .clone()
                .unwrap_or_else(|| self.channel.clone()),
            emotion: overrides
                .emotion
                .clone()
                .unwrap_or_else(|| self.emotion.clone()),
            sample_rate: overrides.sample_rate.unwrap_or(self.sample_rate),
            language_boost: overrides
                .language_boost
                .clone()
                .unwrap_or_else(|| self.language_boost.clone()),
            english_normalization: overrides
                .english_normalization
                .unwrap_or(self.english_normalization),
        }
    }

    /// The `input` object of a provider run call.
    pub fn provider_input(&self, text: &str) -> Value {
        serde_json::json!({
            "text": text,
            "pitch": self.pitch,
            "speed": self.speed,
            "volume": self.volume,
            "bitrate": self.bitrate,
            "channel": self.channel,
            "emotion": self.emotion,
            "voice_id": self.voice_id,
            "sample_rate": self.sample_rate,
            "language_boost": self.language_boost,
            "english_normalization": self.english_normalization,
        })
    }
}

/// Per-call overrides; `None` keeps the adapter default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceOverrides {
    pub voice_id: Option<String>,
    pub pitch: Option<i32>,
    pub speed: Option<f64>,
    pub volume: Option<f64>,
    pub bitrate: Option<u32>,
    pub channel: Option<String>,
    pub emotion: Option<String>,
    pub sample_rate: Option<u32>,
    pub language_boost: Option<String>,
    pub english_normalization: Option<bool>,
}

impl VoiceOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    pub fn pitch(mut self, pitch: i32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn language_boost(mut self, language_boost: impl Into<String>) -> Self {
        self.language_boost = Some(language_boost.into());
        self
    }

    pub fn english_normalization(mut self, enabled: bool) -> Self {
        self.english_normalization = Some(enabled);
        self
    }
}

/// The `input_data` of a record: fingerprint source and cache lookup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Text as sent to the provider (bookmarks removed).
    pub input_text: String,
    pub service: String,
    pub config: VoiceConfig,
}

impl RequestDescriptor {
    pub fn new(input_text: impl Into<String>, config: VoiceConfig) -> Self {
        Self {
            input_text: input_text.into(),
            service: SERVICE_NAME.to_string(),
            config,
        }
    }
}

/// Result of one synthesis, as persisted in the cache index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecord {
    /// Original text, bookmarks included.
    pub input_text: String,
    pub input_data: RequestDescriptor,
    /// Audio file path relative to the cache directory.
    pub original_audio: String,
}

/// Shape of a provider run result, decided once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutput {
    /// `{"output": "<url>", ...}`
    Mapping(String),
    /// `"<url>"`
    Url(String),
    Other(Value),
}

impl ProviderOutput {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::String(url) => Self::Url(url),
            Value::Object(map) => {
                let url = map.get("output").and_then(Value::as_str).map(str::to_string);
                match url {
                    Some(url) => Self::Mapping(url),
                    None => Self::Other(Value::Object(map)),
                }
            }
            other => Self::Other(other),
        }
    }

    /// Audio URL for the two known shapes.
    pub fn into_audio_url(self) -> Result<String> {
        match self {
            Self::Mapping(url) | Self::Url(url) => Ok(url),
            Self::Other(output) => {
                warn!(%output, "provider returned an unexpected shape");
                Err(Error::UnexpectedResponse { output })
            }
        }
    }
}
