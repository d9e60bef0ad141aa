//! Error types for the Abstract SDK
//!
//! One tagged error type for every call, whichever transport ran it. Each
//! variant carries enough context (status code, exit code, stderr) to tell a
//! transient failure from a permanent one.

use abstract_transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with an SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Abstract SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// DNS failure, refused connection, timeout or broken response stream.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-2xx status other than 429.
    #[error("HTTP {code}: {body}")]
    HttpStatus {
        /// HTTP status code
        code: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The API was still rate limiting after the single retry.
    #[error("Rate limited")]
    RateLimited {
        /// Wait hint from the last response, if provided
        retry_after: Option<Duration>,
    },

    /// The CLI executable could not be started.
    #[error("Failed to spawn CLI: {0}")]
    ProcessSpawn(String),

    /// The CLI exited with a non-zero code.
    #[error("CLI exited with code {code}: {stderr}")]
    ProcessExit {
        /// Exit code (-1 when killed by a signal)
        code: i32,
        /// Captured stderr
        stderr: String,
    },

    /// The CLI was killed after running past its timeout.
    #[error("CLI timed out after {timeout:?}")]
    ProcessTimeout {
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// A successful response was not valid JSON.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A webhook payload did not match its signature.
    #[error("Webhook signature does not match payload")]
    SignatureMismatch,

    /// The client or the call is misconfigured.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Check if this error is retryable.
    ///
    /// CLI failures never are: invocations may have side effects.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::RateLimited { .. } => true,
            Error::HttpStatus { code, .. } => *code >= 500,
            _ => false,
        }
    }

    /// Get retry delay if this is a rate limit error with a hint.
    pub fn retry_after(&self) -> Option<Duration> {
        if let Error::RateLimited { retry_after } = self {
            *retry_after
        } else {
            None
        }
    }

    /// HTTP status code, for `HttpStatus` errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { code, .. } => Some(*code),
            Error::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// CLI exit code, for `ProcessExit` errors.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::ProcessExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(msg) => Error::Network(msg),
            TransportError::HttpStatus { code, body } => Error::HttpStatus { code, body },
            TransportError::RateLimited { retry_after } => Error::RateLimited { retry_after },
            TransportError::ProcessSpawn(msg) => Error::ProcessSpawn(msg),
            TransportError::ProcessExit { code, stderr } => Error::ProcessExit { code, stderr },
            TransportError::ProcessTimeout { timeout } => Error::ProcessTimeout { timeout },
            TransportError::MalformedResponse(msg) => Error::MalformedResponse(msg),
            TransportError::Configuration(msg) => Error::Configuration(msg),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::Network("refused".into()), true)]
    #[case(Error::RateLimited { retry_after: None }, true)]
    #[case(Error::HttpStatus { code: 502, body: String::new() }, true)]
    #[case(Error::HttpStatus { code: 404, body: String::new() }, false)]
    #[case(Error::ProcessExit { code: 1, stderr: "boom".into() }, false)]
    #[case(Error::ProcessTimeout { timeout: Duration::from_secs(1) }, false)]
    #[case(Error::SignatureMismatch, false)]
    #[case(Error::Configuration("no url".into()), false)]
    fn test_is_retryable(#[case] err: Error, #[case] expected: bool) {
        assert_eq!(err.is_retryable(), expected);
    }

    #[test]
    fn test_retry_after() {
        let err = Error::RateLimited {
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(Error::Network("x".into()).retry_after(), None);
    }

    #[test]
    fn test_from_transport_error_keeps_context() {
        let err: Error = TransportError::ProcessExit {
            code: 2,
            stderr: "unknown command".into(),
        }
        .into();
        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(err.to_string(), "CLI exited with code 2: unknown command");

        let err: Error = TransportError::HttpStatus {
            code: 403,
            body: "forbidden".into(),
        }
        .into();
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn test_serde_error_is_malformed_response() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(Error::from(parse_err), Error::MalformedResponse(_)));
    }
}
