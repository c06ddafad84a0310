pub mod types;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub use crate::types::{
    CurriculumRequest, CurriculumResponse, HealthStatus, LearningStyle, Level, UnknownChoice,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const GENERATE_PATH: &str = "generate-curriculum";
const HEALTH_PATH: &str = "health";
const FALLBACK_REJECTION: &str = "Failed to generate curriculum";

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error: {}", .0.as_u16())]
    Status(StatusCode),
    #[error("{0}")]
    Rejected(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            user_agent: "CurricuForge/1.0".to_string(),
        }
    }
}

/// Talks to the curriculum generation service.
#[derive(Debug, Clone)]
pub struct CurriculumClient {
    http: Client,
    config: ClientConfig,
}

impl CurriculumClient {
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        debug!(
            target: "curricuforge_client",
            base_url = %config.base_url,
            timeout_secs = config.timeout.as_secs(),
            "client configured"
        );
        Ok(Self { http, config })
    }

    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Posts the request and returns the generated curriculum text.
    ///
    /// A response whose `status` is anything other than `"success"` becomes
    /// [`ClientError::Rejected`] carrying that status, so callers can show it as-is.
    #[instrument(
        name = "curricuforge_client.generate",
        skip(self, request),
        fields(topic = %request.topic)
    )]
    pub async fn generate(&self, request: &CurriculumRequest) -> Result<String> {
        let url = self.endpoint(GENERATE_PATH);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| ClientError::Http(err.to_string()))?;

        let payload: CurriculumResponse = Self::read_json(response, &url).await?;
        if payload.is_success() {
            debug!(
                target: "curricuforge_client",
                chars = payload.curriculum.len(),
                "curriculum received"
            );
            return Ok(payload.curriculum);
        }

        let reason = if payload.status.is_empty() {
            FALLBACK_REJECTION.to_string()
        } else {
            payload.status
        };
        warn!(target: "curricuforge_client", reason = %reason, "generation rejected");
        Err(ClientError::Rejected(reason).into())
    }

    #[instrument(name = "curricuforge_client.health", skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(HEALTH_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| ClientError::Http(err.to_string()))?;
        Self::read_json(response, &url).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn read_json<T>(response: reqwest::Response, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if !response.status().is_success() {
            warn!(
                target: "curricuforge_client",
                status = %response.status(),
                url,
                "curriculum service request failed"
            );
            return Err(ClientError::Status(response.status()).into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ClientError::Http(err.to_string()))?;
        let value = serde_json::from_slice::<T>(&bytes)
            .map_err(|err| ClientError::Decode(format!("{url}: {err}")))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = CurriculumClient::with_config(ClientConfig {
            base_url: "http://example.test/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.endpoint(GENERATE_PATH),
            "http://example.test/generate-curriculum"
        );
    }

    #[test]
    fn status_error_shows_numeric_code() {
        let error = ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "API error: 500");
    }

    #[test]
    fn defaults_point_at_local_service() {
        let client = CurriculumClient::new().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }
}
