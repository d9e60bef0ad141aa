//! Argument vector builder for CLI calls
//!
//! Resources declare their own verb and flag mapping with this builder; the
//! transport executes whatever vector it is handed.

use serde_json::Value;

/// A CLI argument vector, e.g. `project load --id p-1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliCommand {
    args: Vec<String>,
}

impl CliCommand {
    /// Start a command from its leading verbs.
    pub fn new<I, S>(verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: verbs.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append `--name value`.
    pub fn flag(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.push(format!("--{name}"));
        self.args.push(value.into());
        self
    }

    /// Append `--name value` only when a value is present.
    pub fn flag_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.flag(name, value),
            None => self,
        }
    }

    /// Append a bare `--name`.
    pub fn switch(mut self, name: &str) -> Self {
        self.args.push(format!("--{name}"));
        self
    }

    /// Append `--name <compact json>`, for request bodies.
    pub fn json_flag(mut self, name: &str, value: &Value) -> Self {
        self.args.push(format!("--{name}"));
        self.args.push(value.to_string());
        self
    }

    /// The arguments built so far.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Consume the builder.
    pub fn into_args(self) -> Vec<String> {
        self.args
    }
}
