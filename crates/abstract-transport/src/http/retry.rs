//! Rate-limit retry policy for the HTTP transport
//!
//! Only a 429 is retried, and only once. Network failures and other error
//! statuses surface immediately.

use http::HeaderMap;
use std::time::Duration;

/// How long to wait before the single retry of a rate-limited request.
///
/// # Default Configuration
///
/// - `default_delay`: 1s (used when the response has no `Retry-After`)
/// - `max_delay`: 60s (caps whatever the server asks for)
///
/// # Examples
///
/// ```rust
/// use abstract_transport::http::RateLimitRetry;
/// use std::time::Duration;
///
/// let policy = RateLimitRetry::default()
///     .with_default_delay(Duration::from_millis(250))
///     .with_max_delay(Duration::from_secs(10));
///
/// assert_eq!(policy.delay_for(None), Duration::from_millis(250));
/// assert_eq!(policy.delay_for(Some(Duration::from_secs(120))), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRetry {
    default_delay: Duration,
    max_delay: Duration,
}

impl Default for RateLimitRetry {
    fn default() -> Self {
        Self {
            default_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RateLimitRetry {
    /// Set the wait used when the server gives no hint.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Set the upper bound on any wait.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Number of retries performed after a 429. Always one.
    pub const fn max_retries(&self) -> u32 {
        1
    }

    /// Wait before retrying, given the server's hint.
    pub fn delay_for(&self, hint: Option<Duration>) -> Duration {
        hint.unwrap_or(self.default_delay).min(self.max_delay)
    }

    /// Read `Retry-After` as delta-seconds or an HTTP-date.
    pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        let raw = headers
            .get(http::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())?
            .trim();

        if let Ok(secs) = raw.parse::<u64>() {
            return Some(Duration::from_secs(secs));
        }

        let at = chrono::DateTime::parse_from_rfc2822(raw).ok()?;
        let wait = at.with_timezone(&chrono::Utc) - chrono::Utc::now();
        // A date in the past means "now"
        Some(wait.to_std().unwrap_or(Duration::ZERO))
    }
}
