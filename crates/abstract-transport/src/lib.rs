//! Transport layer for the Abstract SDK
//!
//! Provides the two interchangeable execution paths a logical operation can
//! take: a REST call against the Abstract API, or an invocation of the local
//! `abstract-cli` executable. Both return the same [`ResponseEnvelope`] and
//! fail with the same [`TransportError`] taxonomy.
//!
//! # Architecture
//!
//! - **Operation**: transport-agnostic description of a call (method, path, body)
//! - **HTTP transport**: REST client via reqwest, with a single bounded
//!   rate-limit retry
//! - **Subprocess transport**: spawns the CLI with a pre-built argument vector
//!   and drains stdout/stderr concurrently
//! - **Envelope**: normalized `{data, meta}` result for both transports
//!
//! # Usage
//!
//! ```ignore
//! use abstract_transport::{HttpCall, HttpTransport, Operation, Transport};
//!
//! let transport = HttpTransport::new(config)?;
//! let call = HttpCall::new(Operation::get(["projects"]));
//! let envelope = transport.execute(call).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod error;
pub mod http;
pub mod observability;
pub mod operation;
pub mod subprocess;
pub mod traits;

// Re-export commonly used types
pub use envelope::{RateLimitInfo, ResponseEnvelope, ResponseMeta};
pub use error::{Result, TransportError};
pub use http::{HttpCall, HttpTransport, HttpTransportConfig, RateLimitRetry, merge_headers};
pub use operation::{Method, Operation};
pub use subprocess::{CliCall, CliCommand, CliTransport, ProcessConfig, ProcessOutput};
pub use traits::{Transport, TransportMode};

/// Header carrying the per-resource API version pin.
pub const API_VERSION_HEADER: &str = "Abstract-Api-Version";

/// Environment variable the CLI reads its access token from.
pub const CLI_TOKEN_ENV: &str = "ABSTRACT_TOKEN";
