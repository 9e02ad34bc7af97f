//! 语音缓存模块：按请求指纹复用已合成的音频，避免重复调用 Provider。
//!
//! # Voice-over Cache
//!
//! Every synthesis is described by a [`RequestDescriptor`](crate::tts::RequestDescriptor).
//! Its [`Fingerprint`] names the audio file on disk, and the descriptor itself is
//! the lookup key in the cache directory's `cache.json` index.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`SpeechCache`] | Trait for lookup and persistence of records |
//! | [`JsonIndexCache`] | `cache.json` index shared with the voice-over framework |
//! | [`NullCache`] | No-op cache for disabling caching |
//! | [`Fingerprint`] | SHA-256 of a request descriptor |

mod backend;
mod key;

pub use backend::{JsonIndexCache, NullCache, SpeechCache, CACHE_INDEX_FILENAME};
pub use key::{get_audio_basename, Fingerprint};
