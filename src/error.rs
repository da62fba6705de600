//! Error types for Contentful cleanup operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to Contentful or writing reports.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// A required argument or option was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// API request returned a non-success response.
    #[error("Contentful API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    FetchFailed {
        status: Option<u16>,
        message: String,
    },

    /// The per-second rate budget is exhausted.
    #[error("Rate limited, quota resets in {reset_secs:?} seconds")]
    RateLimited { reset_secs: Option<u64> },

    /// Reading or writing a local file failed.
    #[error("Failed to access '{}': {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl CleanupError {
    /// Returns true if this error signals rate-limit exhaustion.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CleanupError::RateLimited { .. })
    }

    /// HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CleanupError::FetchFailed { status, .. } => *status,
            CleanupError::RateLimited { .. } => Some(429),
            CleanupError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Fold a failed page fetch into [`CleanupError::FetchFailed`].
    ///
    /// Argument and local file errors are not fetch failures and pass through.
    pub(crate) fn into_fetch_failed(self) -> Self {
        match self {
            CleanupError::FetchFailed { .. }
            | CleanupError::InvalidArgument(_)
            | CleanupError::FileIo { .. } => self,
            CleanupError::RateLimited { reset_secs } => CleanupError::FetchFailed {
                status: Some(429),
                message: match reset_secs {
                    Some(secs) => format!("rate limit exceeded, quota resets in {secs} seconds"),
                    None => "rate limit exceeded".to_string(),
                },
            },
            other => CleanupError::FetchFailed {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanupError::FileIo {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for cleanup operations.
pub type Result<T> = core::result::Result<T, CleanupError>;
