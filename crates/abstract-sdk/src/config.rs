//! Configuration for the Abstract client

use crate::error::{Error, Result};
use abstract_transport::{RateLimitRetry, TransportMode};
use http::HeaderMap;
use secrecy::SecretString;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Access token, read by both the client and the CLI
pub const ENV_TOKEN: &str = abstract_transport::CLI_TOKEN_ENV;
/// API base URL
pub const ENV_API_URL: &str = "ABSTRACT_API_URL";
/// Path to the CLI executable
pub const ENV_CLI_PATH: &str = "ABSTRACT_CLI_PATH";
/// Default transport, `api` or `cli`
pub const ENV_TRANSPORT: &str = "ABSTRACT_TRANSPORT";
/// HTTP request timeout in seconds
pub const ENV_TIMEOUT: &str = "ABSTRACT_TIMEOUT";
/// CLI process timeout in seconds
pub const ENV_CLI_TIMEOUT: &str = "ABSTRACT_CLI_TIMEOUT";

/// Public Abstract API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.goabstract.com";

/// Configuration for the Abstract client.
///
/// Set once when the client is built and never mutated afterwards. The
/// configured `mode` needs its matching field: `api_base_url` for
/// [`TransportMode::Api`], `cli_executable_path` for [`TransportMode::Cli`].
/// The other transport is available for per-call overrides only if its
/// field is set too.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Default transport
    pub mode: TransportMode,

    /// Base URL for the API
    pub api_base_url: Option<String>,

    /// Path to the CLI executable
    pub cli_executable_path: Option<PathBuf>,

    /// Arguments inserted before every CLI call's own arguments
    pub cli_leading_args: Vec<String>,

    /// Working directory for the CLI; the current one when `None`
    pub cli_working_dir: Option<PathBuf>,

    /// Extra environment variables for the CLI
    pub cli_env: HashMap<String, String>,

    /// Access token (bearer token for the API, `ABSTRACT_TOKEN` for the CLI)
    pub auth_token: Option<SecretString>,

    /// Headers sent with every API request
    pub default_headers: HeaderMap,

    /// HTTP request timeout
    pub timeout: Duration,

    /// CLI process timeout
    pub cli_timeout: Duration,

    /// Wait policy for the single rate-limit retry
    pub rate_limit: RateLimitRetry,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::Api,
            api_base_url: None,
            cli_executable_path: None,
            cli_leading_args: Vec::new(),
            cli_working_dir: None,
            cli_env: HashMap::new(),
            auth_token: None,
            default_headers: HeaderMap::new(),
            timeout: Duration::from_secs(600),
            cli_timeout: Duration::from_secs(300),
            rate_limit: RateLimitRetry::default(),
        }
    }
}

impl ClientConfig {
    /// API-mode configuration against `base_url`.
    pub fn api(base_url: impl Into<String>) -> Self {
        Self {
            mode: TransportMode::Api,
            api_base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// CLI-mode configuration running `executable`.
    pub fn cli(executable: impl Into<PathBuf>) -> Self {
        Self {
            mode: TransportMode::Cli,
            cli_executable_path: Some(executable.into()),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `ABSTRACT_TOKEN` for authentication
    /// - `ABSTRACT_API_URL` for the API base URL
    /// - `ABSTRACT_CLI_PATH` for the CLI executable
    /// - `ABSTRACT_TRANSPORT` for the default transport (`api` or `cli`)
    /// - `ABSTRACT_TIMEOUT` and `ABSTRACT_CLI_TIMEOUT` in seconds
    ///
    /// With the `env` feature a `.env` file is loaded first. When neither
    /// transport is configured the public API URL is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        use std::env;

        #[cfg(feature = "env")]
        {
            // A missing .env file is fine
            let _ = dotenvy::dotenv();
        }

        let mut config = Self::default();

        if let Ok(token) = env::var(ENV_TOKEN) {
            config.auth_token = Some(SecretString::new(token.into_boxed_str()));
        }

        if let Ok(url) = env::var(ENV_API_URL) {
            config.api_base_url = Some(url);
        }

        if let Ok(path) = env::var(ENV_CLI_PATH) {
            config.cli_executable_path = Some(PathBuf::from(path));
        }

        if let Ok(mode) = env::var(ENV_TRANSPORT) {
            config.mode = mode.parse()?;
        } else if config.api_base_url.is_none() && config.cli_executable_path.is_some() {
            config.mode = TransportMode::Cli;
        }

        if config.mode == TransportMode::Api && config.api_base_url.is_none() {
            config.api_base_url = Some(DEFAULT_API_URL.to_string());
        }

        if let Some(timeout) = env_secs(ENV_TIMEOUT)? {
            config.timeout = timeout;
        }
        if let Some(timeout) = env_secs(ENV_CLI_TIMEOUT)? {
            config.cli_timeout = timeout;
        }

        Ok(config)
    }

    /// Check that the configured mode has the field it needs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the missing field.
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            TransportMode::Api if self.api_base_url.is_none() => Err(Error::Configuration(
                "API mode requires an API base URL".to_string(),
            )),
            TransportMode::Cli if self.cli_executable_path.is_none() => {
                Err(Error::Configuration(
                    "CLI mode requires a CLI executable path".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

fn env_secs(name: &str) -> Result<Option<Duration>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| Error::Configuration(format!("{name} must be a number of seconds"))),
        Err(_) => Ok(None),
    }
}
