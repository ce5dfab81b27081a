//! Error types for upstream fetches

use std::time::Duration;

use thiserror::Error;

/// Main error type for all client operations
///
/// None of these ever escape an orchestrator invocation; they are logged and
/// the affected resources are reported as absent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No API credential is available
    #[error("no API credential available")]
    CredentialMissing,

    /// The request did not settle within its timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or protocol failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// HTTP success with an `error` object embedded in the payload
    #[error("upstream error {code}: {message}")]
    Upstream { code: i64, message: String },

    /// Required fields are missing or have the wrong shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Invalid base URL or endpoint path
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Snapshot sink (persistence collaborator) failed
    #[error("sink error: {0}")]
    Sink(String),
}

impl ApiError {
    /// Classify the error for logs and metrics
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::CredentialMissing => FailureKind::Credential,
            ApiError::Timeout(_) => FailureKind::Timeout,
            ApiError::Transport(_) | ApiError::Status(_) => FailureKind::Transport,
            ApiError::Upstream { .. } => FailureKind::Upstream,
            ApiError::Malformed(_) => FailureKind::Malformed,
            ApiError::InvalidUrl(_) => FailureKind::Config,
            ApiError::Sink(_) => FailureKind::Sink,
        }
    }

    /// Whether the failure points at the caller (bad key, bad parameters)
    /// rather than the network
    pub fn is_caller_side(&self) -> bool {
        matches!(
            self,
            ApiError::Upstream { .. } | ApiError::CredentialMissing | ApiError::InvalidUrl(_)
        )
    }
}

/// Coarse failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Credential,
    Timeout,
    Transport,
    Upstream,
    Malformed,
    Config,
    Sink,
}

impl FailureKind {
    /// Get kind as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Credential => "credential",
            FailureKind::Timeout => "timeout",
            FailureKind::Transport => "transport",
            FailureKind::Upstream => "upstream",
            FailureKind::Malformed => "malformed",
            FailureKind::Config => "config",
            FailureKind::Sink => "sink",
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;
