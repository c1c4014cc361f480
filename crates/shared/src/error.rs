use thiserror::Error;

/// Text shown in the output pane whenever a request cycle fails, whatever the cause.
pub const TRANSFORM_ERROR_TEXT: &str = "Error transforming webhook.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformErrorKind {
    Network,
    Timeout,
    RemoteStatus,
    MalformedResponse,
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transform request failed: {0}")]
    Network(String),
    #[error("transform request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u128 },
    #[error("transform service answered {status}: {body}")]
    RemoteStatus { status: u16, body: String },
    #[error("transform service returned a malformed body: {0}")]
    MalformedResponse(String),
}

impl TransformError {
    pub fn kind(&self) -> TransformErrorKind {
        match self {
            Self::Network(_) => TransformErrorKind::Network,
            Self::Timeout { .. } => TransformErrorKind::Timeout,
            Self::RemoteStatus { .. } => TransformErrorKind::RemoteStatus,
            Self::MalformedResponse(_) => TransformErrorKind::MalformedResponse,
        }
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedResponse(value.to_string())
    }
}
