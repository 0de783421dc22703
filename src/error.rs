use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EsError {
    #[error("No endpoints given")]
    NoEndpoints,

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Failed to load root certificates from '{path}': {reason}")]
    Certificates { path: String, reason: String },

    #[error("Cluster at {endpoint} is unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl EsError {
    /// Errors raised while building a client. The client was never handed out.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            EsError::NoEndpoints
                | EsError::InvalidEndpoint { .. }
                | EsError::ClientBuild(_)
                | EsError::Certificates { .. }
                | EsError::Unreachable { .. }
        )
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            EsError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EsError>;
