//! Cache backend implementations.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::tts::{RequestDescriptor, SpeechRecord};
use crate::{Error, ErrorContext, Result};

/// Name of the index file kept inside every cache directory.
pub const CACHE_INDEX_FILENAME: &str = "cache.json";

/// Lookup and persistence of finished synthesis records.
pub trait SpeechCache: Send + Sync {
    /// Record whose `input_data` equals `descriptor`, if any.
    fn lookup(&self, descriptor: &RequestDescriptor, cache_dir: &Path)
        -> Result<Option<SpeechRecord>>;
    fn store(&self, record: &SpeechRecord, cache_dir: &Path) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// `cache.json` index: a JSON array of records shared with other services.
///
/// Entries that are not replicate records are kept untouched and skipped on
/// lookup.
#[derive(Debug, Clone, Default)]
pub struct JsonIndexCache;

impl JsonIndexCache {
    pub fn new() -> Self {
        Self
    }

    pub fn index_path(cache_dir: &Path) -> PathBuf {
        cache_dir.join(CACHE_INDEX_FILENAME)
    }

    fn read_index(path: &Path) -> Result<Vec<Value>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Array(entries) => Ok(entries),
            _ => Err(Error::configuration_with_context(
                "cache index is not a JSON array",
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("cache"),
            )),
        }
    }

    fn write_index(path: &Path, entries: &[Value]) -> Result<()> {
        let tmp = path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl SpeechCache for JsonIndexCache {
    fn lookup(
        &self,
        descriptor: &RequestDescriptor,
        cache_dir: &Path,
    ) -> Result<Option<SpeechRecord>> {
        let wanted = serde_json::to_value(descriptor)?;
        let entries = Self::read_index(&Self::index_path(cache_dir))?;
        let Some(entry) = entries
            .into_iter()
            .find(|entry| entry.get("input_data") == Some(&wanted))
        else {
            debug!(cache_dir = %cache_dir.display(), "cache miss");
            return Ok(None);
        };

        let record: SpeechRecord = serde_json::from_value(entry)?;
        if !cache_dir.join(&record.original_audio).is_file() {
            warn!(
                audio = %record.original_audio,
                "cached record points at a missing audio file; regenerating"
            );
            return Ok(None);
        }
        debug!(audio = %record.original_audio, "cache hit");
        Ok(Some(record))
    }

    fn store(&self, record: &SpeechRecord, cache_dir: &Path) -> Result<()> {
        fs::create_dir_all(cache_dir)?;
        let path = Self::index_path(cache_dir);
        let mut entries = Self::read_index(&path)?;
        let wanted = serde_json::to_value(&record.input_data)?;
        entries.retain(|entry| entry.get("input_data") != Some(&wanted));
        entries.push(serde_json::to_value(record)?);
        Self::write_index(&path, &entries)
    }

    fn name(&self) -> &'static str {
        "json-index"
    }
}

/// Never hits, discards stores.
#[derive(Debug, Clone, Default)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechCache for NullCache {
    fn lookup(&self, _: &RequestDescriptor, _: &Path) -> Result<Option<SpeechRecord>> {
        Ok(None)
    }
    fn store(&self, _: &SpeechRecord, _: &Path) -> Result<()> {
        Ok(())
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
