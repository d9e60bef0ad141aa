//! Transport error types

use std::time::Duration;
use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
///
/// Every non-success outcome of either transport is one of these variants;
/// raw `reqwest`, `io` or `serde_json` errors never escape.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS failure, refused connection, timeout or a broken response stream
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response other than a rate limit
    #[error("HTTP {code}: {body}")]
    HttpStatus {
        /// HTTP status code
        code: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// Still rate limited after the single retry
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Wait hint from the last 429 response, if any
        retry_after: Option<Duration>,
    },

    /// The CLI executable could not be started
    #[error("Failed to spawn CLI: {0}")]
    ProcessSpawn(String),

    /// The CLI exited with a non-zero code
    #[error("CLI exited with code {code}: {stderr}")]
    ProcessExit {
        /// Exit code, or -1 if the process was terminated by a signal
        code: i32,
        /// Everything the process wrote to stderr
        stderr: String,
    },

    /// The CLI did not exit within its timeout and was killed
    #[error("CLI timed out after {timeout:?}")]
    ProcessTimeout {
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// A success response (2xx body or zero-exit stdout) was not valid JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The transport was asked to do something its configuration cannot express
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TransportError {
    /// Check if this error is transient.
    ///
    /// Process failures are never transient: CLI calls may have side effects.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } => true,
            Self::HttpStatus { code, .. } => *code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}
