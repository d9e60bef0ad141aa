//! Per-call request options

use crate::error::{Error, Result};
use abstract_transport::TransportMode;
use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Overrides for a single call.
///
/// Nothing here touches the client: a per-call transport mode only changes
/// which transport that one call uses.
///
/// ```rust
/// use abstract_sdk::RequestOptions;
/// use abstract_sdk::TransportMode;
/// use std::time::Duration;
///
/// let options = RequestOptions::new()
///     .transport_mode(TransportMode::Cli)
///     .timeout(Duration::from_secs(30))
///     .header("x-request-source", "ci")
///     .unwrap();
/// assert_eq!(options.transport_mode, Some(TransportMode::Cli));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Transport for this call, overriding the client's mode
    pub transport_mode: Option<TransportMode>,

    /// Headers for this call; they win over client defaults. Ignored by the CLI.
    pub headers: HeaderMap,

    /// Timeout for this call (HTTP request or CLI process)
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the HTTP API for this call.
    pub fn api() -> Self {
        Self::new().transport_mode(TransportMode::Api)
    }

    /// Force the CLI for this call.
    pub fn cli() -> Self {
        Self::new().transport_mode(TransportMode::Cli)
    }

    /// Override the transport mode.
    pub fn transport_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = Some(mode);
        self
    }

    /// Add a header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the name or value is not valid HTTP.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Replace all per-call headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| Error::Configuration(format!("invalid header name: {name:?}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|_| Error::Configuration(format!("invalid value for header {name}")))?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_has_no_overrides() {
        let options = RequestOptions::default();
        assert!(options.transport_mode.is_none());
        assert!(options.headers.is_empty());
        assert!(options.timeout.is_none());
    }

    #[test]
    fn test_mode_shortcuts() {
        assert_eq!(RequestOptions::api().transport_mode, Some(TransportMode::Api));
        assert_eq!(RequestOptions::cli().transport_mode, Some(TransportMode::Cli));
    }

    #[test]
    fn test_header_validation() {
        let options = RequestOptions::new().header("x-trace", "abc").unwrap();
        assert_eq!(options.headers["x-trace"], "abc");

        assert_matches!(
            RequestOptions::new().header("bad header", "x"),
            Err(Error::Configuration(_))
        );
        assert_matches!(
            RequestOptions::new().header("x-ok", "line\nbreak"),
            Err(Error::Configuration(_))
        );
    }
}
