//! Replicate predictions API driver.

use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use super::{ModelRef, SpeechProvider};
use crate::transport::HttpTransport;
use crate::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.replicate.com";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Runs predictions through `POST /v1/models/{owner}/{name}/predictions`
/// (or `/v1/predictions` for pinned versions) and waits for them to finish.
#[derive(Clone)]
pub struct ReplicateDriver {
    transport: HttpTransport,
    api_base: String,
    poll_interval: Duration,
}

impl std::fmt::Debug for ReplicateDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateDriver")
            .field("api_base", &self.api_base)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl ReplicateDriver {
    pub fn new(transport: HttpTransport) -> Self {
        Self {
            transport,
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn create_prediction(&self, model: &ModelRef, input: &Value, token: &str) -> Result<Value> {
        let (url, body) = match &model.version {
            Some(version) => (
                format!("{}/v1/predictions", self.api_base),
                json!({ "version": version, "input": input }),
            ),
            None => (
                format!(
                    "{}/v1/models/{}/{}/predictions",
                    self.api_base, model.owner, model.name
                ),
                json!({ "input": input }),
            ),
        };
        self.transport
            .post_json(&url, &body, token, &[("Prefer", "wait")])
    }

    fn poll_url(&self, prediction: &Value) -> Option<String> {
        prediction
            .pointer("/urls/get")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                prediction
                    .get("id")
                    .and_then(Value::as_str)
                    .map(|id| format!("{}/v1/predictions/{}", self.api_base, id))
            })
    }
}

impl SpeechProvider for ReplicateDriver {
    fn provider_id(&self) -> &str {
        "replicate"
    }

    fn run(&self, model: &str, input: &Value, api_token: &str) -> Result<Value> {
        let model_ref = ModelRef::parse(model)?;
        let mut prediction = self.create_prediction(&model_ref, input, api_token)?;

        loop {
            let status = match prediction.get("status").and_then(Value::as_str) {
                Some(status) => status.to_string(),
                // Not a prediction object; the adapter decides what to make of it.
                None => return Ok(prediction),
            };
            match status.as_str() {
                "succeeded" => return Ok(prediction),
                "failed" | "canceled" => {
                    return Err(Error::Prediction {
                        id: prediction
                            .get("id")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        message: prediction
                            .get("error")
                            .and_then(Value::as_str)
                            .unwrap_or("no error detail")
                            .to_string(),
                        status,
                    });
                }
                _ => {
                    let Some(url) = self.poll_url(&prediction) else {
                        return Ok(prediction);
                    };
                    debug!(%status, %url, "prediction pending");
                    thread::sleep(self.poll_interval);
                    prediction = self.transport.get_json(&url, api_token)?;
                }
            }
        }
    }
}
