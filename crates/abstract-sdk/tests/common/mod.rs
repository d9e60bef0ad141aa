//! Shared helpers for integration tests

#![allow(dead_code)]

use abstract_sdk::{Client, ClientBuilder, RateLimitRetry, TransportMode};
use std::time::Duration;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Send tracing output to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builder for a client that runs `/bin/sh -c <script>` as its CLI.
///
/// Arguments of each call reach the script as `$1..$n`.
pub fn shell_cli(builder: ClientBuilder, script: &str) -> ClientBuilder {
    builder
        .cli_executable_path("/bin/sh")
        .cli_leading_arg("-c")
        .cli_leading_arg(script)
        .cli_leading_arg("abstract-cli")
}

/// API-mode client against a mock server.
pub fn api_client(server: &MockServer) -> Client {
    Client::builder()
        .api_base_url(server.uri())
        .auth_token(TOKEN)
        .rate_limit(RateLimitRetry::default().with_default_delay(Duration::from_millis(10)))
        .build()
        .expect("Failed to build API client")
}

/// CLI-mode client running `script`.
pub fn cli_client(script: &str) -> Client {
    shell_cli(Client::builder().mode(TransportMode::Cli), script)
        .auth_token(TOKEN)
        .build()
        .expect("Failed to build CLI client")
}

/// Client with both transports configured and `mode` as the default.
pub fn dual_client(mode: TransportMode, server: &MockServer, script: &str) -> Client {
    shell_cli(Client::builder().mode(mode), script)
        .api_base_url(server.uri())
        .auth_token(TOKEN)
        .build()
        .expect("Failed to build dual-transport client")
}

/// Script printing its argument vector as `{"argv": [...]}`.
pub const ECHO_ARGV: &str = r#"
printf '{"argv":['
sep=''
for a in "$@"; do
  esc=$(printf '%s' "$a" | sed 's/\\/\\\\/g; s/"/\\"/g')
  printf '%s"%s"' "$sep" "$esc"
  sep=','
done
printf ']}'
"#;
