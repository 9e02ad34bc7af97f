//! Provider 驱动抽象层 — 远程语音合成推理调用
//!
//! Provider driver abstraction for the remote inference call. The adapter only
//! needs one operation: run a model with an input payload and hand back whatever
//! the provider returned; shape interpretation happens in the adapter.

pub mod replicate;

use serde_json::Value;

use crate::{Error, ErrorContext, Result};

pub use replicate::ReplicateDriver;

/// Remote inference call.
///
/// Implementations block the calling thread until the provider has produced a
/// final answer. They must not retry.
pub trait SpeechProvider: Send + Sync + std::fmt::Debug {
    /// Unique provider identifier.
    fn provider_id(&self) -> &str;

    /// Run `model` with `input` and return the provider's raw result.
    fn run(&self, model: &str, input: &Value, api_token: &str) -> Result<Value>;
}

/// A parsed `owner/name[:version]` model reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub owner: String,
    pub name: String,
    pub version: Option<String>,
}

impl ModelRef {
    pub fn parse(model: &str) -> Result<Self> {
        let invalid = |details: &str| {
            Error::validation_with_context(
                format!("invalid model reference '{}'", model),
                ErrorContext::new()
                    .with_field_path("voice.model")
                    .with_details(details)
                    .with_source("drivers"),
            )
        };

        let (path, version) = match model.split_once(':') {
            Some((path, version)) if !version.is_empty() => (path, Some(version.to_string())),
            Some(_) => return Err(invalid("empty version after ':'")),
            None => (model, None),
        };
        let (owner, name) = path
            .split_once('/')
            .ok_or_else(|| invalid("expected owner/name"))?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid("expected owner/name"));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            version,
        })
    }
}
