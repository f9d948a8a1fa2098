//! Error types shared across the service

use thiserror::Error;

/// Top-level error type for the classification service
#[derive(Error, Debug)]
pub enum Error {
    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Rule engine error: {0}")]
    Rules(String),

    #[error("Sidecar error: {0}")]
    Sidecar(String),

    #[error("Reputation error: {0}")]
    Reputation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Deadline exceeded")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes for ML sidecar calls, used as log and metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MlErrorKind {
    /// Deadline exceeded or explicit request timeout
    Timeout,
    /// ML service returned a 5xx response
    Http5xx,
    /// ML service returned a 4xx response
    Http4xx,
    /// Transport failure: connection refused, DNS failure, TCP reset
    Connection,
    /// JSON decode failure or unexpected EOF
    Decode,
    Unknown,
}

impl MlErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MlErrorKind::Timeout => "timeout",
            MlErrorKind::Http5xx => "5xx",
            MlErrorKind::Http4xx => "4xx",
            MlErrorKind::Connection => "connection",
            MlErrorKind::Decode => "decode",
            MlErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MlErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified ML sidecar failure
#[derive(Error, Debug)]
#[error("ML call failed ({kind}): {detail}")]
pub struct MlError {
    pub kind: MlErrorKind,
    pub detail: String,
}

impl MlError {
    pub fn new(kind: MlErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(MlErrorKind::Timeout, "deadline exceeded")
    }
}

impl From<MlError> for Error {
    fn from(err: MlError) -> Self {
        Error::Sidecar(err.to_string())
    }
}
