//! Process management for CLI calls

use crate::CLI_TOKEN_ENV;
use crate::error::{Result, TransportError};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Configuration for spawning the CLI
#[derive(Clone, Debug)]
pub struct ProcessConfig {
    /// Path to the CLI executable
    pub executable: PathBuf,

    /// Arguments placed before every call's own arguments
    pub leading_args: Vec<String>,

    /// Extra environment variables to set
    pub env: HashMap<String, String>,

    /// Start from an empty environment instead of inheriting the parent's
    pub clear_env: bool,

    /// Working directory; the parent's when `None`
    pub working_dir: Option<PathBuf>,

    /// Access token, passed as `ABSTRACT_TOKEN`
    pub auth_token: Option<SecretString>,

    /// Default timeout for one invocation
    pub timeout: Duration,
}

impl ProcessConfig {
    /// Default per-invocation timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Create a new process configuration
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            leading_args: Vec::new(),
            env: HashMap::new(),
            clear_env: false,
            working_dir: None,
            auth_token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Add a leading argument
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.leading_args.push(arg.into());
        self
    }

    /// Set an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Do not inherit the parent environment.
    ///
    /// Only variables set via [`ProcessConfig::with_env`] (and the token)
    /// reach the child.
    pub fn with_isolated_env(mut self) -> Self {
        self.clear_env = true;
        self
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the access token
    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.leading_args).args(args);

        if self.clear_env {
            cmd.env_clear();
        }
        cmd.envs(&self.env);
        if let Some(token) = &self.auth_token {
            cmd.env(CLI_TOKEN_ENV, token.expose_secret());
        }
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        // No stdin: the CLI must never wait on an interactive prompt
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }
}

/// Everything a finished process produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, -1 if terminated by a signal
    pub exit_code: i32,
    /// Buffered stdout
    pub stdout: Vec<u8>,
    /// Buffered stderr
    pub stderr: Vec<u8>,
}

/// Run the CLI to completion.
///
/// stdout and stderr are drained by two background tasks while the process
/// runs, so a child that fills a pipe buffer before exiting cannot deadlock.
/// The timeout covers both the exit and the end of both streams; a
/// background process that keeps a pipe open past it fails the call too.
/// On timeout the child is killed and the drains are aborted.
pub async fn run(config: &ProcessConfig, args: &[String], timeout: Duration) -> Result<ProcessOutput> {
    let mut child = config.command(args).spawn().map_err(|e| {
        TransportError::ProcessSpawn(format!("{}: {e}", config.executable.display()))
    })?;
    let child_id = child.id();

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| TransportError::ProcessSpawn("stdout was not captured".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| TransportError::ProcessSpawn("stderr was not captured".to_string()))?;

    let mut stdout_task = drain(stdout);
    let mut stderr_task = drain(stderr);

    let finished = tokio::time::timeout(timeout, async {
        let status = child
            .wait()
            .await
            .map_err(|e| TransportError::ProcessSpawn(format!("failed waiting for CLI: {e}")))?;
        Ok(ProcessOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout: collect(&mut stdout_task, "stdout").await?,
            stderr: collect(&mut stderr_task, "stderr").await?,
        })
    })
    .await;

    match finished {
        Ok(result) => {
            if result.is_err() {
                stdout_task.abort();
                stderr_task.abort();
            }
            result
        }
        Err(_) => {
            // The direct child may already be gone while a descendant holds the pipes
            if matches!(child.try_wait(), Ok(None))
                && let Err(e) = child.kill().await
            {
                tracing::warn!(
                    "Failed to kill timed-out CLI process {}: {}",
                    child_id.unwrap_or(0),
                    e
                );
            }
            stdout_task.abort();
            stderr_task.abort();
            Err(TransportError::ProcessTimeout { timeout })
        }
    }
}

fn drain<R>(mut stream: R) -> JoinHandle<std::io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;
        Ok(buf)
    })
}

async fn collect(task: &mut JoinHandle<std::io::Result<Vec<u8>>>, name: &str) -> Result<Vec<u8>> {
    match task.await {
        Ok(Ok(buf)) => Ok(buf),
        Ok(Err(e)) => Err(TransportError::ProcessSpawn(format!(
            "failed reading CLI {name}: {e}"
        ))),
        Err(e) => Err(TransportError::ProcessSpawn(format!(
            "CLI {name} reader stopped: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_config_defaults() {
        let config = ProcessConfig::new("abstract-cli");
        assert_eq!(config.executable, PathBuf::from("abstract-cli"));
        assert!(config.leading_args.is_empty());
        assert!(!config.clear_env);
        assert_eq!(config.timeout, ProcessConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_process_config_builder() {
        let config = ProcessConfig::new("/usr/local/bin/abstract-cli")
            .with_arg("--verbose")
            .with_env("ABSTRACT_API_URL", "https://api.example.com")
            .with_isolated_env()
            .with_working_dir("/tmp")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.leading_args, vec!["--verbose".to_string()]);
        assert_eq!(
            config.env.get("ABSTRACT_API_URL").map(String::as_str),
            Some("https://api.example.com")
        );
        assert!(config.clear_env);
        assert_eq!(config.working_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_collects_both_streams() {
        let config = ProcessConfig::new("/bin/sh")
            .with_arg("-c")
            .with_arg("printf out; printf err >&2; exit 3")
            .with_arg("abstract-cli");

        let output = run(&config, &[], Duration::from_secs(10)).await.unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, b"out");
        assert_eq!(output.stderr, b"err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_token_is_passed_through_env() {
        let config = ProcessConfig::new("/bin/sh")
            .with_arg("-c")
            .with_arg("printf '%s' \"$ABSTRACT_TOKEN\"")
            .with_arg("abstract-cli")
            .with_auth_token(SecretString::new("tok-123".into()));

        let output = run(&config, &[], Duration::from_secs(10)).await.unwrap();
        assert_eq!(output.stdout, b"tok-123");
    }
}
