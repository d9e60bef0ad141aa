//! Structured logging for transport calls
//!
//! Both transports log through this layer so HTTP requests and CLI
//! invocations produce the same event shapes.

use crate::traits::TransportMode;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What is being called, for log fields
#[derive(Debug, Clone)]
pub struct CallMetadata {
    /// Transport handling the call
    pub transport: TransportMode,
    /// HTTP method, or the CLI executable
    pub method: String,
    /// Request path, or the CLI arguments joined with spaces
    pub target: String,
    start: Instant,
}

impl CallMetadata {
    /// Metadata for an HTTP request
    pub fn http(method: &http::Method, path: &str) -> Self {
        Self {
            transport: TransportMode::Api,
            method: method.to_string(),
            target: path.to_string(),
            start: Instant::now(),
        }
    }

    /// Metadata for a CLI invocation
    pub fn cli(executable: &str, args: &[String]) -> Self {
        Self {
            transport: TransportMode::Cli,
            method: executable.to_string(),
            target: args.join(" "),
            start: Instant::now(),
        }
    }

    /// Time since the call started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Log the call being issued
    pub fn log_start(&self) {
        debug!(
            transport = %self.transport,
            method = %self.method,
            target = %self.target,
            "Starting transport call"
        );
    }

    /// Log a successful call
    pub fn log_success(&self, code: i64, retries: u32) {
        info!(
            transport = %self.transport,
            method = %self.method,
            target = %self.target,
            code,
            elapsed_ms = self.elapsed().as_millis(),
            retries,
            "Transport call succeeded"
        );
    }

    /// Log a failed call
    pub fn log_failure(&self, error: &crate::TransportError) {
        warn!(
            transport = %self.transport,
            method = %self.method,
            target = %self.target,
            elapsed_ms = self.elapsed().as_millis(),
            error = %error,
            "Transport call failed"
        );
    }
}
