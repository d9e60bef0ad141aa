//! Transport selection for a single call
//!
//! A resource hands the dispatcher one action per transport it supports. The
//! dispatcher resolves the effective mode, picks exactly one action and runs
//! it; the other is dropped without being started. A failure is returned as
//! is, never retried on the other transport.

use crate::error::{Error, Result};
use crate::options::RequestOptions;
use abstract_transport::TransportMode;
use std::future::Future;
use tracing::Instrument;
use uuid::Uuid;

/// The action chosen for a call.
#[derive(Debug)]
pub enum TransportAction<H, C> {
    /// Run over the HTTP API
    Http(H),
    /// Run through the CLI
    Cli(C),
}

/// CLI action type for operations the CLI cannot perform.
pub type NoCli<T> = fn() -> std::future::Ready<Result<T>>;

/// Picks and runs one transport action per call.
///
/// Holds only the client's configured mode, which never changes.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    mode: TransportMode,
}

impl Dispatcher {
    /// Create a dispatcher for the client's configured mode.
    pub fn new(mode: TransportMode) -> Self {
        Self { mode }
    }

    /// The client's configured mode.
    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// The per-call override if present, else the configured mode.
    pub fn effective_mode(&self, options: &RequestOptions) -> TransportMode {
        options.transport_mode.unwrap_or(self.mode)
    }

    /// Choose the action for a call without running it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the effective mode is CLI and the
    /// operation has no CLI action.
    pub fn select<H, C>(
        &self,
        http: H,
        cli: Option<C>,
        options: &RequestOptions,
    ) -> Result<TransportAction<H, C>> {
        match (self.effective_mode(options), cli) {
            (TransportMode::Api, _) => Ok(TransportAction::Http(http)),
            (TransportMode::Cli, Some(cli)) => Ok(TransportAction::Cli(cli)),
            (TransportMode::Cli, None) => Err(Error::Configuration(
                "operation is not available over the CLI transport".to_string(),
            )),
        }
    }

    /// Run exactly one of `http` or `cli`, according to the effective mode.
    pub async fn dispatch<T, H, HF, C, CF>(
        &self,
        http: H,
        cli: Option<C>,
        options: &RequestOptions,
    ) -> Result<T>
    where
        H: FnOnce() -> HF,
        HF: Future<Output = Result<T>>,
        C: FnOnce() -> CF,
        CF: Future<Output = Result<T>>,
    {
        let mode = self.effective_mode(options);
        let span = tracing::info_span!("dispatch", call_id = %Uuid::new_v4(), mode = %mode);

        async move {
            match self.select(http, cli, options)? {
                TransportAction::Http(action) => action().await,
                TransportAction::Cli(action) => action().await,
            }
        }
        .instrument(span)
        .await
    }

    /// Dispatch an operation only the API supports.
    pub async fn dispatch_api_only<T, H, HF>(&self, http: H, options: &RequestOptions) -> Result<T>
    where
        H: FnOnce() -> HF,
        HF: Future<Output = Result<T>>,
    {
        self.dispatch(http, None::<NoCli<T>>, options).await
    }

    /// Run a transport-independent action, whatever the mode.
    pub async fn dispatch_local<T, F, Fut>(&self, action: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let span = tracing::info_span!("dispatch", call_id = %Uuid::new_v4(), mode = "local");
        action().instrument(span).await
    }
}
