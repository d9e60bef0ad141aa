//! Normalized `{data, meta}` result shared by both transports

use crate::traits::TransportMode;
use http::HeaderMap;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Rate limit state reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed in the current window
    pub limit: Option<u32>,
    /// Requests remaining in the current window
    pub remaining: Option<u32>,
    /// When the window resets
    pub reset_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl RateLimitInfo {
    /// Read `x-ratelimit-*` headers; `None` if none are present.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let info = Self {
            limit: parse_header_u32(headers, "x-ratelimit-limit"),
            remaining: parse_header_u32(headers, "x-ratelimit-remaining"),
            reset_at: parse_header_reset(headers, "x-ratelimit-reset"),
        };

        if info == Self::default() {
            None
        } else {
            Some(info)
        }
    }
}

/// Diagnostic metadata. Transport-specific fields are `None` for the other
/// transport, so the shape is the same either way.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// Transport that produced the response
    pub transport: TransportMode,
    /// HTTP status (API transport)
    pub status: Option<u16>,
    /// Process exit code (CLI transport)
    pub exit_code: Option<i32>,
    /// Response headers, lowercase names (empty for CLI)
    pub headers: HashMap<String, String>,
    /// Rate limit state, if reported
    pub rate_limit: Option<RateLimitInfo>,
    /// Top-level `meta` object of the body, if present
    pub pagination: Option<Value>,
    /// Number of retries performed
    pub retries: u32,
    /// Wall time of the whole call, including retries
    pub elapsed: Duration,
}

impl ResponseMeta {
    /// Metadata for an HTTP response.
    pub fn http(status: u16, headers: &HeaderMap) -> Self {
        Self {
            transport: TransportMode::Api,
            status: Some(status),
            exit_code: None,
            headers: headers
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
                .collect(),
            rate_limit: RateLimitInfo::from_headers(headers),
            pagination: None,
            retries: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Metadata for a finished CLI process.
    pub fn cli(exit_code: i32) -> Self {
        Self {
            transport: TransportMode::Cli,
            status: None,
            exit_code: Some(exit_code),
            headers: HashMap::new(),
            rate_limit: None,
            pagination: None,
            retries: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Result of one call, whichever transport ran it.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// Parsed payload; `None` for a void result (empty body or stdout)
    pub data: Option<Value>,
    /// Diagnostics
    pub meta: ResponseMeta,
}

impl ResponseEnvelope {
    /// Build an envelope, lifting the body's `meta` object into `meta.pagination`.
    pub fn new(data: Option<Value>, mut meta: ResponseMeta) -> Self {
        if meta.pagination.is_none() {
            meta.pagination = data
                .as_ref()
                .and_then(|d| d.get("meta"))
                .filter(|m| m.is_object())
                .cloned();
        }
        Self { data, meta }
    }

    /// Parse a success body. Whitespace-only bodies are void results.
    pub fn parse(raw: &[u8], meta: ResponseMeta) -> crate::Result<Self> {
        let data = if raw.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice::<Value>(raw)?)
        };
        Ok(Self::new(data, meta))
    }

    /// The caller-visible payload.
    ///
    /// Unwraps `{ "data": ... }` bodies; bare arrays and objects are returned
    /// as-is. A void result becomes `Value::Null`.
    pub fn into_payload(self) -> Value {
        match self.data {
            Some(Value::Object(mut map)) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            Some(other) => other,
            None => Value::Null,
        }
    }

    /// Deserialize the payload into a concrete type.
    pub fn payload_as<T: serde::de::DeserializeOwned>(self) -> crate::Result<T> {
        Ok(serde_json::from_value(self.into_payload())?)
    }
}

fn parse_header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

// Reset is either an RFC 3339 timestamp or unix seconds.
fn parse_header_reset(headers: &HeaderMap, name: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let raw = headers.get(name).and_then(|v| v.to_str().ok())?.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&chrono::Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
}
