//! Subprocess transport for CLI invocations
//!
//! Runs the `abstract-cli` executable once per call with a pre-built
//! argument vector, buffers its output and parses JSON from stdout.

pub mod cli;
pub mod command;
pub mod process;

pub use cli::{CliCall, CliTransport};
pub use command::CliCommand;
pub use process::{ProcessConfig, ProcessOutput};
