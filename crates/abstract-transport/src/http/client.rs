//! HTTP transport client implementation
//!
//! Implements the Transport trait for REST calls against the Abstract API:
//! URL joining, header merging, JSON parsing and status mapping, with one
//! bounded retry for rate-limited requests.

use crate::envelope::{ResponseEnvelope, ResponseMeta};
use crate::error::{Result, TransportError};
use crate::observability::CallMetadata;
use crate::operation::Operation;
use crate::traits::{Transport, TransportMode};
use async_trait::async_trait;
use http::{HeaderMap, HeaderValue, StatusCode, header};
use reqwest::Client as ReqwestClient;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use super::headers::merge_headers;
use super::retry::RateLimitRetry;

/// HTTP transport implementation
///
/// Handles REST calls with:
/// - Bearer token authentication
/// - Header precedence (per-call > client defaults > injected)
/// - Exactly one retry after a 429, waiting the server's hint
/// - Per-request timeouts
///
/// Idle connections are not pooled: every call opens its own connection.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    config: Arc<HttpTransportConfig>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.config.base_url.as_str())
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(0)
            .user_agent(concat!("abstract-sdk-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Base URL every path is joined onto
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Join the base URL and an operation path.
    ///
    /// Plain concatenation rather than `Url::join`, so a base URL with a
    /// path prefix (`https://host/api`) keeps its prefix.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        let joined = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&joined)
            .map_err(|e| TransportError::Configuration(format!("invalid URL '{joined}': {e}")))
    }

    /// Headers the transport adds on its own, including the operation's.
    fn injected_headers(&self, operation: &Operation) -> Result<HeaderMap> {
        let mut injected = HeaderMap::new();
        injected.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if operation.body.is_some() {
            injected.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }

        if let Some(token) = &self.config.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| {
                    TransportError::Configuration("auth token is not a valid header value".into())
                })?;
            value.set_sensitive(true);
            injected.insert(header::AUTHORIZATION, value);
        }

        for (name, value) in &operation.headers {
            injected.insert(name.clone(), value.clone());
        }

        Ok(injected)
    }

    async fn send_with_rate_limit_retry(&self, call: &HttpCall) -> Result<ResponseEnvelope> {
        let started = Instant::now();
        let operation = &call.operation;
        let url = self.url_for(&operation.path)?;
        let headers = merge_headers(
            &self.injected_headers(operation)?,
            &self.config.default_headers,
            &call.headers,
        );
        let body = operation
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| TransportError::Configuration(format!("unserializable body: {e}")))?;
        let timeout = call.timeout.unwrap_or(self.config.timeout);

        let mut retries = 0;
        loop {
            let (status, response_headers, response_body) = self
                .try_send_request(operation, &url, &headers, body.as_deref(), timeout)
                .await?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let hint = RateLimitRetry::parse_retry_after(&response_headers);
                if retries >= self.config.rate_limit.max_retries() {
                    return Err(TransportError::RateLimited { retry_after: hint });
                }

                let delay = self.config.rate_limit.delay_for(hint);
                tracing::warn!(
                    path = %operation.path,
                    delay_ms = delay.as_millis(),
                    "Rate limited, retrying once"
                );
                tokio::time::sleep(delay).await;
                retries += 1;
                continue;
            }

            if !status.is_success() {
                return Err(TransportError::HttpStatus {
                    code: status.as_u16(),
                    body: String::from_utf8_lossy(&response_body).into_owned(),
                });
            }

            let mut meta = ResponseMeta::http(status.as_u16(), &response_headers);
            meta.retries = retries;
            meta.elapsed = started.elapsed();
            return ResponseEnvelope::parse(&response_body, meta);
        }
    }

    async fn try_send_request(
        &self,
        operation: &Operation,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<(StatusCode, HeaderMap, Vec<u8>)> {
        let mut req = self
            .client
            .request(operation.method.clone(), url.clone())
            .headers(headers.clone())
            .timeout(timeout);

        if let Some(body) = body {
            req = req.body(body.to_vec());
        }

        let response = req.send().await.map_err(|e| network_error(e, timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| network_error(e, timeout))?
            .to_vec();

        Ok((status, headers, body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    type Call = HttpCall;

    fn mode(&self) -> TransportMode {
        TransportMode::Api
    }

    async fn execute(&self, call: HttpCall) -> Result<ResponseEnvelope> {
        let log = CallMetadata::http(&call.operation.method, &call.operation.path);
        log.log_start();

        let result = self.send_with_rate_limit_retry(&call).await;
        match &result {
            Ok(envelope) => log.log_success(
                i64::from(envelope.meta.status.unwrap_or_default()),
                envelope.meta.retries,
            ),
            Err(err) => log.log_failure(err),
        }
        result
    }
}

fn network_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Network(format!("request timed out after {timeout:?}"))
    } else {
        TransportError::Network(err.to_string())
    }
}

/// One HTTP call: the operation plus per-call overrides
#[derive(Debug, Clone)]
pub struct HttpCall {
    /// What to do
    pub operation: Operation,
    /// Per-call headers (highest precedence)
    pub headers: HeaderMap,
    /// Per-call timeout, overriding the transport default
    pub timeout: Option<Duration>,
}

impl HttpCall {
    /// Create a call with no overrides
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Set per-call headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set a per-call timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// API base URL
    pub base_url: Url,

    /// Bearer token sent as `Authorization`
    pub auth_token: Option<SecretString>,

    /// Client-wide headers (middle precedence)
    pub default_headers: HeaderMap,

    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Rate-limit retry policy
    pub rate_limit: RateLimitRetry,
}

impl HttpTransportConfig {
    /// Configuration with defaults for everything but the base URL
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_token: None,
            default_headers: HeaderMap::new(),
            timeout: Duration::from_secs(600),
            connect_timeout: Duration::from_secs(30),
            rate_limit: RateLimitRetry::default(),
        }
    }

    /// Set the bearer token
    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }
}
