//! CLI transport implementation
//!
//! Executes one `abstract-cli` invocation per call and maps its outcome:
//! exit 0 parses stdout as JSON (empty stdout is a void result), any other
//! exit code becomes [`TransportError::ProcessExit`] carrying stderr.

use crate::envelope::{ResponseEnvelope, ResponseMeta};
use crate::error::{Result, TransportError};
use crate::observability::CallMetadata;
use crate::traits::{Transport, TransportMode};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::command::CliCommand;
use super::process::{self, ProcessConfig};

/// Subprocess transport for the Abstract CLI
#[derive(Debug, Clone)]
pub struct CliTransport {
    config: Arc<ProcessConfig>,
}

impl CliTransport {
    /// Create a new CLI transport
    pub fn new(config: ProcessConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The spawn configuration
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for CliTransport {
    type Call = CliCall;

    fn mode(&self) -> TransportMode {
        TransportMode::Cli
    }

    async fn execute(&self, call: CliCall) -> Result<ResponseEnvelope> {
        let args = call.command.into_args();
        let log = CallMetadata::cli(&self.config.executable.to_string_lossy(), &args);
        log.log_start();

        let timeout = call.timeout.unwrap_or(self.config.timeout);
        let result = process::run(&self.config, &args, timeout)
            .await
            .and_then(|output| {
                if output.exit_code != 0 {
                    return Err(TransportError::ProcessExit {
                        code: output.exit_code,
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    });
                }

                if !output.stderr.is_empty() {
                    tracing::debug!(
                        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                        "CLI wrote to stderr"
                    );
                }

                let mut meta = ResponseMeta::cli(output.exit_code);
                meta.elapsed = log.elapsed();
                ResponseEnvelope::parse(&output.stdout, meta)
            });

        match &result {
            Ok(envelope) => log.log_success(i64::from(envelope.meta.exit_code.unwrap_or_default()), 0),
            Err(err) => log.log_failure(err),
        }
        result
    }
}

/// One CLI call: the argument vector plus an optional timeout override
#[derive(Debug, Clone)]
pub struct CliCall {
    /// Arguments after the executable and its leading args
    pub command: CliCommand,
    /// Per-call timeout, overriding the transport default
    pub timeout: Option<Duration>,
}

impl CliCall {
    /// Create a call with the default timeout
    pub fn new(command: CliCommand) -> Self {
        Self {
            command,
            timeout: None,
        }
    }

    /// Set a per-call timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
