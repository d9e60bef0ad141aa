//! Transport-agnostic operation descriptor
//!
//! An [`Operation`] says *what* to do: method, resource path and optional
//! JSON body, plus any headers the resource itself injects (such as the API
//! version pin). The HTTP transport turns it into a request; the CLI side
//! builds its own argument vector from the same intent.

use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

pub use http::Method;

use crate::API_VERSION_HEADER;

/// Description of a single logical action against a resource.
#[derive(Debug, Clone)]
pub struct Operation {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API base URL, query already encoded
    pub path: String,
    /// Optional JSON body
    pub body: Option<Value>,
    /// Headers injected by the resource (lowest precedence)
    pub headers: HeaderMap,
}

impl Operation {
    /// Create an operation from path segments.
    ///
    /// Segments are joined with `/`; empty segments are skipped.
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = segments
            .into_iter()
            .filter(|s| !s.as_ref().is_empty())
            .map(|s| s.as_ref().trim_matches('/').to_string())
            .collect::<Vec<_>>()
            .join("/");

        Self {
            method,
            path,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// GET operation
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Method::GET, segments)
    }

    /// POST operation
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Method::POST, segments)
    }

    /// PUT operation
    pub fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Method::PUT, segments)
    }

    /// DELETE operation
    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Method::DELETE, segments)
    }

    /// Append a pre-encoded query string (without the leading `?`).
    pub fn with_query(mut self, query: impl AsRef<str>) -> Self {
        let query = query.as_ref().trim_start_matches('?');
        if !query.is_empty() {
            self.path.push('?');
            self.path.push_str(query);
        }
        self
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a resource-level header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Pin the API version for this resource family.
    pub fn with_api_version(self, version: &'static str) -> Self {
        self.with_header(
            HeaderName::from_static("abstract-api-version"),
            HeaderValue::from_static(version),
        )
    }

    /// The pinned API version, if any.
    pub fn api_version(&self) -> Option<&str> {
        self.headers
            .get(API_VERSION_HEADER)
            .and_then(|v| v.to_str().ok())
    }
}
