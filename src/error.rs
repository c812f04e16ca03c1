//! Unified error types for the status page service.

use reqwest::StatusCode;
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Status fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the fetch step of a render.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not complete (DNS, refused connection, timeout, body read).
    #[error("status request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("status endpoint returned HTTP {0}")]
    UnexpectedStatus(StatusCode),

    /// The body exceeds the accepted size.
    #[error("status response body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Size cap in bytes.
        limit: usize,
    },

    /// The body is not a valid status snapshot.
    #[error("failed to parse status snapshot: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

impl FetchError {
    /// Coarse classification used for logs, metric labels and the fallback page.
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network(_) => FailureKind::Network,
            FetchError::UnexpectedStatus(_) => FailureKind::Status,
            FetchError::BodyTooLarge { .. } | FetchError::Parse(_) => FailureKind::Parse,
        }
    }
}

/// Failure classification of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FailureKind {
    /// Backend unreachable.
    Network,
    /// Backend reachable but answered with an error status.
    Status,
    /// Backend answered with an unusable body.
    Parse,
}

impl FailureKind {
    /// Human-readable reason shown on the fallback page.
    pub fn describe(&self) -> &'static str {
        match self {
            FailureKind::Network => "the status service could not be reached",
            FailureKind::Status => "the status service reported an error",
            FailureKind::Parse => "the status service sent an unreadable response",
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
