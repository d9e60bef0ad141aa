//! # Abstract SDK
//!
//! Rust client for the Abstract design-file service. Every operation can run
//! over either of two transports:
//! - the remote HTTP API
//! - the local `abstract-cli` executable, spawned per call
//!
//! The transport is chosen when the client is built and can be overridden
//! for a single call with [`RequestOptions`]. Both return the same payload
//! and fail with the same [`Error`] type.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use abstract_sdk::{Client, RequestOptions, TransportMode};
//! use abstract_sdk::resources::ProjectDescriptor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), abstract_sdk::Error> {
//!     let client = Client::builder()
//!         .mode(TransportMode::Cli)
//!         .cli_executable_path("/usr/local/bin/abstract-cli")
//!         .api_base_url("https://api.goabstract.com")
//!         .auth_token("my-token")
//!         .build()?;
//!
//!     let project = ProjectDescriptor::new("b8bf5540-6e1e-11e6-8526-2d315b6ef48f");
//!
//!     // Runs through the CLI
//!     let local = client.projects().info(&project, &RequestOptions::default()).await?;
//!
//!     // Same call over HTTP
//!     let remote = client.projects().info(&project, &RequestOptions::api()).await?;
//!     assert_eq!(local["id"], remote["id"]);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use dispatch::{Dispatcher, NoCli, TransportAction};
pub use error::{Error, Result};
pub use options::RequestOptions;
pub use signature::SignatureVerifier;

pub use abstract_transport::{
    CliCommand, Method, Operation, RateLimitInfo, RateLimitRetry, ResponseEnvelope, ResponseMeta,
    TransportMode,
};

// Module declarations
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod options;
pub mod resources;
pub mod signature;

/// Transport layer, for callers building their own operations.
pub use abstract_transport as transport;
