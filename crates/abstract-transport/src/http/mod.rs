//! HTTP transport implementation
//!
//! Provides the REST half of the transport layer: URL construction, header
//! merging, status mapping and the single rate-limit retry.

pub mod client;
pub mod headers;
pub mod retry;

pub use client::{HttpCall, HttpTransport, HttpTransportConfig};
pub use headers::merge_headers;
pub use retry::RateLimitRetry;
