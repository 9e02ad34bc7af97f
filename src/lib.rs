//! # replicate-voiceover
//!
//! 通过 Replicate 托管模型为配音流水线合成语音，并在本地缓存音频。
//!
//! Text-to-speech adapter for voice-over pipelines: text goes to a hosted model
//! on Replicate, the resulting audio is downloaded into a cache directory, and a
//! record describing it is returned to the caller.
//!
//! ## Flow
//!
//! Every call is linear and blocking: merge per-call overrides over the adapter
//! defaults, strip bookmark markup, look the request up in the cache, check the
//! API token, run the model, resolve the audio URL from the result, download the
//! bytes and return a [`SpeechRecord`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use replicate_voiceover::config::{load_dotenv, Settings};
//! use replicate_voiceover::{ReplicateService, VoiceOverrides};
//!
//! fn main() -> replicate_voiceover::Result<()> {
//!     load_dotenv();
//!     let service = ReplicateService::from_settings(&Settings::from_env())?;
//!     let record = service.synthesize(
//!         "Hello <bookmark mark='A'/>world",
//!         None,
//!         &VoiceOverrides::new().emotion("calm"),
//!     )?;
//!     println!("{}", record.original_audio);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tts`] | The adapter, its configuration and record types |
//! | [`cache`] | Fingerprints and the `cache.json` index |
//! | [`drivers`] | Remote inference call (Replicate predictions API) |
//! | [`transport`] | Blocking HTTP and streamed downloads |
//! | [`config`] | `.env`, environment and YAML settings |
//! | [`utils`] | Bookmark stripping and slugs |

pub mod cache;
pub mod config;
pub mod drivers;
pub mod transport;
pub mod tts;
pub mod utils;

pub use tts::{
    ProviderOutput, ReplicateService, ReplicateServiceBuilder, RequestDescriptor, SpeechRecord,
    VoiceConfig, VoiceOverrides,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
