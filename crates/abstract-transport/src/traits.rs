//! Transport trait and transport selection
//!
//! Defines the generic Transport trait implemented by the HTTP and
//! subprocess transports, and the mode used to choose between them.

use crate::envelope::ResponseEnvelope;
use crate::error::{Result, TransportError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which execution path a call takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Remote HTTP API
    #[default]
    Api,
    /// Local CLI executable
    Cli,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => f.write_str("api"),
            Self::Cli => f.write_str("cli"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" | "http" => Ok(Self::Api),
            "cli" => Ok(Self::Cli),
            other => Err(TransportError::Configuration(format!(
                "unknown transport mode '{other}' (expected 'api' or 'cli')"
            ))),
        }
    }
}

/// Generic transport trait for the two execution paths
///
/// Each transport derives its own request representation from the caller's
/// intent, so the input type is transport-specific.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport-specific description of one call
    type Call: Send;

    /// The mode this transport serves
    fn mode(&self) -> TransportMode;

    /// Execute a single call and normalize its outcome
    async fn execute(&self, call: Self::Call) -> Result<ResponseEnvelope>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("api", TransportMode::Api)]
    #[case("API", TransportMode::Api)]
    #[case("http", TransportMode::Api)]
    #[case(" cli ", TransportMode::Cli)]
    fn test_transport_mode_parsing(#[case] input: &str, #[case] expected: TransportMode) {
        assert_eq!(input.parse::<TransportMode>().unwrap(), expected);
    }

    #[test]
    fn test_transport_mode_rejects_unknown() {
        let err = "grpc".parse::<TransportMode>().unwrap_err();
        assert!(matches!(err, TransportError::Configuration(_)));
    }

    #[test]
    fn test_transport_mode_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransportMode::Cli).unwrap(),
            "\"cli\""
        );
        assert_eq!(
            serde_json::from_str::<TransportMode>("\"api\"").unwrap(),
            TransportMode::Api
        );
    }
}
