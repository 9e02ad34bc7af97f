use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, info};

use crate::{Error, ErrorContext, Result};

/// Size of each chunk copied from the download stream to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Thin wrapper over a blocking reqwest client.
///
/// No timeouts are configured: a slow provider or audio host blocks the
/// calling thread until it answers.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<std::time::Duration>)
            .user_agent(concat!("replicate-voiceover/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                Error::DependencyMissing(format!("HTTP client could not be initialised: {}", e))
            })?;
        Ok(Self { client })
    }

    pub fn post_json(
        &self,
        url: &str,
        body: &Value,
        bearer: &str,
        headers: &[(&str, &str)],
    ) -> Result<Value> {
        debug!(%url, "POST");
        let mut request = self.client.post(url).bearer_auth(bearer).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Self::read_json(request)
    }

    pub fn get_json(&self, url: &str, bearer: &str) -> Result<Value> {
        debug!(%url, "GET");
        Self::read_json(self.client.get(url).bearer_auth(bearer))
    }

    /// Stream `url` into `target`, creating parent directories as needed.
    ///
    /// Bytes land in a hidden sibling file first and are renamed over `target`
    /// only once the whole body has been written; on failure the partial file
    /// is removed and `target` is left as it was.
    pub fn download_to_file(&self, url: &str, target: &Path) -> Result<u64> {
        let url = Self::audio_url(url)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let partial = target.with_file_name(format!(
            ".{}.{}.part",
            file_name,
            uuid::Uuid::new_v4()
        ));

        let written = match self.stream_into(url.as_str(), &partial) {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&partial);
                return Err(e);
            }
        };
        if let Err(e) = fs::rename(&partial, target) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        info!(%url, path = %target.display(), bytes = written, "audio downloaded");
        Ok(written)
    }

    fn audio_url(raw: &str) -> Result<url::Url> {
        let invalid = |details: String| {
            Error::validation_with_context(
                format!("audio URL '{}' cannot be downloaded", raw),
                ErrorContext::new()
                    .with_details(details)
                    .with_source("transport"),
            )
        };
        let parsed = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(invalid(format!("unsupported scheme '{}'", other))),
        }
    }

    fn stream_into(&self, url: &str, path: &Path) -> Result<u64> {
        let mut response = Self::check_status(self.client.get(url).send()?)?;
        let mut file = File::create(path)?;
        let mut buf = [0u8; DOWNLOAD_CHUNK_SIZE];
        let mut written = 0u64;
        loop {
            let n = response.read(&mut buf)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            written += n as u64;
        }
        file.flush()?;
        Ok(written)
    }

    fn read_json(request: RequestBuilder) -> Result<Value> {
        let response = Self::check_status(request.send()?)?;
        Ok(response.json()?)
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(Error::Remote {
            status: status.as_u16(),
            message: body,
        })
    }
}
