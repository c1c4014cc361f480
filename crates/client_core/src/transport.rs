//! Outbound call to the remote transform endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use shared::{domain::TransformRequest, error::TransformError};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_ENDPOINT_PATH: &str = "/webhook";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid transform server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("invalid transform endpoint path '{path}': {source}")]
    InvalidEndpointPath {
        path: String,
        source: url::ParseError,
    },
}

#[async_trait]
pub trait TransformTransport: Send + Sync {
    /// Issues exactly one transform request. No retries.
    async fn transform(&self, request: &TransformRequest) -> Result<Value, TransformError>;
}

pub struct HttpTransformTransport {
    http: Client,
    endpoint: Url,
    request_timeout: Duration,
}

impl HttpTransformTransport {
    pub fn new(endpoint: Url, request_timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            request_timeout,
        }
    }

    pub fn from_server_url(
        server_url: &str,
        endpoint_path: &str,
        request_timeout: Duration,
    ) -> Result<Self, EndpointError> {
        Ok(Self::new(
            resolve_endpoint(server_url, endpoint_path)?,
            request_timeout,
        ))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> TransformError {
        if err.is_timeout() {
            TransformError::Timeout {
                timeout_ms: self.request_timeout.as_millis(),
            }
        } else {
            TransformError::Network(err.to_string())
        }
    }
}

pub fn resolve_endpoint(server_url: &str, endpoint_path: &str) -> Result<Url, EndpointError> {
    let base = Url::parse(server_url.trim()).map_err(|source| EndpointError::InvalidServerUrl {
        url: server_url.to_string(),
        source,
    })?;
    base.join(endpoint_path.trim())
        .map_err(|source| EndpointError::InvalidEndpointPath {
            path: endpoint_path.to_string(),
            source,
        })
}

#[async_trait]
impl TransformTransport for HttpTransformTransport {
    async fn transform(&self, request: &TransformRequest) -> Result<Value, TransformError> {
        debug!(
            endpoint = %self.endpoint,
            source = %request.source,
            format = %request.format,
            "posting payload to transform endpoint"
        );

        // Body is the payload text verbatim, never re-encoded.
        let response = self
            .http
            .post(self.endpoint.clone())
            .query(&request.query_pairs())
            .header(CONTENT_TYPE, "application/json")
            .body(request.payload.clone())
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransformError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
