//! TTS（文字转语音）模块：通过 Replicate 托管模型将文本合成为音频并缓存到本地。

mod client;
mod types;

pub use client::{ReplicateService, ReplicateServiceBuilder, AUDIO_EXTENSION};
pub use types::{
    ProviderOutput, RequestDescriptor, SpeechRecord, VoiceConfig, VoiceOverrides,
    DEFAULT_MODEL, DEFAULT_VOICE_ID, SERVICE_NAME,
};
