//! Request fingerprints and audio basenames.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::tts::RequestDescriptor;
use crate::utils::slugify;
use crate::Result;

/// Characters of input text that feed the filename slug.
const SLUG_SOURCE_CHARS: usize = 50;
/// Hex characters of the fingerprint appended to the slug.
const BASENAME_HASH_CHARS: usize = 8;

/// SHA-256 of the canonical JSON serialization of a request descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(descriptor: &RequestDescriptor) -> Result<Self> {
        let canonical = serde_json::to_string(descriptor)?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        Ok(Self(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        &self.0[..BASENAME_HASH_CHARS]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default audio filename (without extension) for a descriptor:
/// `<slug of the first 50 chars>-<8 hex chars of the fingerprint>`.
pub fn get_audio_basename(descriptor: &RequestDescriptor) -> Result<String> {
    let fingerprint = Fingerprint::of(descriptor)?;
    let head: String = descriptor
        .input_text
        .chars()
        .take(SLUG_SOURCE_CHARS)
        .collect();
    let slug = slugify(&head);
    if slug.is_empty() {
        Ok(fingerprint.short().to_string())
    } else {
        Ok(format!("{}-{}", slug, fingerprint.short()))
    }
}
