use async_trait::async_trait;
use crate::core::{Algorithm, AlgorithmInput, AlgorithmStep, StepBatch};
use crate::input::source::{StepResult, StepSource, StepSourceError};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// Where the step service listens unless configured otherwise
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

const USER_AGENT: &str = concat!("algoviz/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct StepsResponse {
    steps: Vec<AlgorithmStep>,
    #[serde(default)]
    complexity: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Client for the step-generation service
pub struct HttpStepSource {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpStepSource {
    pub fn new(base_url: &str) -> StepResult<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> StepResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| StepSourceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full endpoint URL for `algorithm`, without query parameters
    pub fn url_for(&self, algorithm: Algorithm) -> String {
        format!("{}{}", self.base_url, algorithm.endpoint())
    }
}

#[async_trait]
impl StepSource for HttpStepSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, algorithm: Algorithm, input: &AlgorithmInput) -> StepResult<StepBatch> {
        input.validate(algorithm)?;

        let url = self.url_for(algorithm);
        let query = input.query_pairs();
        debug!(%url, ?query, "Requesting algorithm steps");

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| StepSourceError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StepSourceError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| body.trim().to_string());
            return Err(StepSourceError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let decoded: StepsResponse =
            serde_json::from_str(&body).map_err(|e| StepSourceError::Decode(e.to_string()))?;

        let complexity = decoded
            .complexity
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect();

        info!(
            algorithm = %algorithm,
            steps = decoded.steps.len(),
            "Fetched algorithm steps"
        );

        Ok(StepBatch {
            algorithm,
            steps: decoded.steps,
            complexity,
            fetched_at: Utc::now(),
        })
    }
}
