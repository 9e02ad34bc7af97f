//! Mock HTTP server setup for integration tests

use std::path::Path;
use std::time::Duration;

use mockito::{Matcher, Mock, Server, ServerGuard};
use replicate_voiceover::{ReplicateService, VoiceConfig};
use serde_json::Value;
use tempfile::TempDir;

pub const MODEL_PATH: &str = "/v1/models/minimax/speech-02-hd/predictions";
pub const AUDIO_BYTES: &[u8] = b"ID3\x03\x00fake-mp3-payload";

/// Sets a uniquely named token variable so parallel tests never share one.
pub fn token_env(test: &str) -> String {
    let var = format!("RV_TEST_TOKEN_{}", test.to_uppercase());
    std::env::set_var(&var, "r8_test_token");
    var
}

/// Test fixture that owns a mock server and a scratch cache directory
pub struct MockReplicate {
    pub server: ServerGuard,
    pub cache: TempDir,
}

impl MockReplicate {
    pub fn new() -> Self {
        Self {
            server: Server::new(),
            cache: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn cache_dir(&self) -> &Path {
        self.cache.path()
    }

    /// Service pointed at the mock server, reading its token from `token_env`.
    pub fn service(&self, token_env: &str) -> ReplicateService {
        self.service_with(VoiceConfig::default(), token_env)
    }

    pub fn service_with(&self, config: VoiceConfig, token_env: &str) -> ReplicateService {
        ReplicateService::builder()
            .config(config)
            .cache_dir(self.cache.path())
            .api_base(self.url())
            .api_token_env(token_env)
            .poll_interval(Duration::from_millis(5))
            .build()
            .expect("service builds")
    }

    /// Prediction creation returning `body`.
    pub fn mock_prediction(&mut self, body: Value) -> Mock {
        self.prediction(body).create()
    }

    /// Like [`mock_prediction`](Self::mock_prediction), hit exactly `hits` times.
    pub fn mock_prediction_times(&mut self, body: Value, hits: usize) -> Mock {
        self.prediction(body).expect(hits).create()
    }

    fn prediction(&mut self, body: Value) -> Mock {
        self.server
            .mock("POST", MODEL_PATH)
            .match_header("authorization", "Bearer r8_test_token")
            .match_header("prefer", "wait")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    /// Prediction creation, hit exactly `hits` times, that only matches when the input contains `input`.
    pub fn mock_prediction_matching(&mut self, input: Value, body: Value, hits: usize) -> Mock {
        self.server
            .mock("POST", MODEL_PATH)
            .match_body(Matcher::PartialJson(serde_json::json!({ "input": input })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(hits)
            .create()
    }

    pub fn mock_audio(&mut self, path: &str) -> Mock {
        self.audio(path).create()
    }

    pub fn mock_audio_times(&mut self, path: &str, hits: usize) -> Mock {
        self.audio(path).expect(hits).create()
    }

    fn audio(&mut self, path: &str) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(AUDIO_BYTES)
    }

    pub fn audio_url(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }

    /// Files in the cache directory, sorted, hidden ones included.
    pub fn cache_listing(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.cache.path())
            .expect("read cache dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
