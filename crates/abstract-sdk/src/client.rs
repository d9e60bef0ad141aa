//! Main client implementation for the Abstract service

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use abstract_transport::{
    CliCall, CliCommand, CliTransport, HttpCall, HttpTransport, HttpTransportConfig, Operation,
    ProcessConfig, RateLimitRetry, ResponseEnvelope, Transport, TransportMode,
};
use secrecy::SecretString;
use serde_json::Value;
use url::Url;

use crate::{
    config::ClientConfig,
    dispatch::Dispatcher,
    error::{Error, Result},
    options::{RequestOptions, parse_header},
    resources::{Projects, Shares, Webhooks},
};

/// Main client for the Abstract service.
///
/// Owns the read-only configuration and whichever transports it enables.
/// Resource objects borrow nothing from it: each holds a cheap clone.
///
/// # Example
///
/// ```rust,no_run
/// use abstract_sdk::{Client, RequestOptions};
///
/// # async fn example() -> Result<(), abstract_sdk::Error> {
/// let client = Client::builder()
///     .api_base_url("https://api.goabstract.com")
///     .auth_token("my-token")
///     .build()?;
///
/// let projects = client.projects().list(None, &RequestOptions::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    dispatcher: Dispatcher,
    http: Option<HttpTransport>,
    cli: Option<CliTransport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("mode", &self.inner.config.mode)
            .field("http", &self.inner.http)
            .field("cli", &self.inner.cli.as_ref().map(|c| &c.config().executable))
            .finish()
    }
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from `ABSTRACT_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`] and [`Client::from_config`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client from a configuration object.
    ///
    /// Builds the HTTP transport when a base URL is set and the CLI transport
    /// when an executable path is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the configured mode lacks its
    /// field, or the base URL does not parse.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = config
            .api_base_url
            .as_deref()
            .map(|raw| http_transport(&config, raw))
            .transpose()?;
        let cli = config
            .cli_executable_path
            .as_ref()
            .map(|path| cli_transport(&config, path.as_path()));

        tracing::debug!(
            mode = %config.mode,
            http = http.is_some(),
            cli = cli.is_some(),
            "Abstract client configured"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                dispatcher: Dispatcher::new(config.mode),
                config,
                http,
                cli,
            }),
        })
    }

    /// The configured default transport.
    pub fn mode(&self) -> TransportMode {
        self.inner.config.mode
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The dispatcher shared by every resource.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// Access the Projects resource.
    pub fn projects(&self) -> Projects {
        Projects::new(self.clone())
    }

    /// Access the Webhooks resource.
    pub fn webhooks(&self) -> Webhooks {
        Webhooks::new(self.clone())
    }

    /// Access the Shares resource.
    pub fn shares(&self) -> Shares {
        Shares::new(self.clone())
    }

    /// Dispatch an operation and return the caller-visible payload.
    ///
    /// `command` is the operation's CLI form; `None` marks the operation as
    /// API-only. The payload is the body's `data` field when it has one.
    pub async fn request(
        &self,
        operation: Operation,
        command: Option<CliCommand>,
        options: &RequestOptions,
    ) -> Result<Value> {
        Ok(self
            .request_envelope(operation, command, options)
            .await?
            .into_payload())
    }

    /// Dispatch an operation and return the full `{data, meta}` envelope.
    pub async fn request_envelope(
        &self,
        operation: Operation,
        command: Option<CliCommand>,
        options: &RequestOptions,
    ) -> Result<ResponseEnvelope> {
        self.inner
            .dispatcher
            .dispatch(
                move || self.execute_http(operation, options),
                command.map(|command| move || self.execute_cli(command, options)),
                options,
            )
            .await
    }

    /// Run an operation over HTTP, regardless of mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no API base URL is configured.
    pub async fn execute_http(
        &self,
        operation: Operation,
        options: &RequestOptions,
    ) -> Result<ResponseEnvelope> {
        let transport = self.inner.http.as_ref().ok_or_else(|| {
            Error::Configuration("no API base URL configured for the API transport".to_string())
        })?;

        let call = HttpCall::new(operation)
            .with_headers(options.headers.clone())
            .with_timeout(options.timeout);
        Ok(transport.execute(call).await?)
    }

    /// Run a CLI command, regardless of mode.
    ///
    /// Per-call headers have no CLI equivalent and are not sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no CLI executable is configured.
    pub async fn execute_cli(
        &self,
        command: CliCommand,
        options: &RequestOptions,
    ) -> Result<ResponseEnvelope> {
        let transport = self.inner.cli.as_ref().ok_or_else(|| {
            Error::Configuration("no CLI executable configured for the CLI transport".to_string())
        })?;

        if !options.headers.is_empty() {
            tracing::debug!(
                count = options.headers.len(),
                "Per-call headers are not forwarded to the CLI"
            );
        }

        let call = CliCall::new(command).with_timeout(options.timeout);
        Ok(transport.execute(call).await?)
    }
}

fn http_transport(config: &ClientConfig, raw: &str) -> Result<HttpTransport> {
    let base_url = Url::parse(raw)
        .map_err(|e| Error::Configuration(format!("invalid API base URL '{raw}': {e}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(Error::Configuration(format!(
            "API base URL must be http or https, got '{raw}'"
        )));
    }

    let mut http = HttpTransportConfig::new(base_url);
    http.auth_token = config.auth_token.clone();
    http.default_headers = config.default_headers.clone();
    http.timeout = config.timeout;
    http.rate_limit = config.rate_limit;
    Ok(HttpTransport::new(http)?)
}

fn cli_transport(config: &ClientConfig, path: &Path) -> CliTransport {
    let mut process = ProcessConfig::new(path).with_timeout(config.cli_timeout);
    process.leading_args = config.cli_leading_args.clone();
    process.env = config.cli_env.clone();
    process.working_dir = config.cli_working_dir.clone();
    process.auth_token = config.auth_token.clone();
    CliTransport::new(process)
}

/// Builder for creating a configured Client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the default transport.
    pub fn mode(mut self, mode: TransportMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = Some(url.into());
        self
    }

    /// Set the CLI executable path.
    pub fn cli_executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cli_executable_path = Some(path.into());
        self
    }

    /// Add an argument placed before every CLI call's own arguments.
    pub fn cli_leading_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.cli_leading_args.push(arg.into());
        self
    }

    /// Set the CLI working directory.
    pub fn cli_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cli_working_dir = Some(dir.into());
        self
    }

    /// Set an environment variable for the CLI.
    pub fn cli_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.cli_env.insert(key.into(), value.into());
        self
    }

    /// Set the access token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_token = Some(SecretString::new(token.into().into_boxed_str()));
        self
    }

    /// Add a header sent with every API request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the name or value is not valid HTTP.
    pub fn default_header(mut self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        self.config.default_headers.insert(name, value);
        Ok(self)
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the CLI process timeout.
    pub fn cli_timeout(mut self, timeout: Duration) -> Self {
        self.config.cli_timeout = timeout;
        self
    }

    /// Set the rate-limit retry wait policy.
    pub fn rate_limit(mut self, policy: RateLimitRetry) -> Self {
        self.config.rate_limit = policy;
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}
