//! Integration tests for the CLI subprocess transport
//!
//! Each test runs `/bin/sh -c '<script>' abstract-cli <args...>`, so the
//! call's argument vector shows up in the script as `$1..$n`.

#![cfg(unix)]

use abstract_transport::{
    CliCall, CliCommand, CliTransport, ProcessConfig, Transport, TransportError,
};
use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use std::time::{Duration, Instant};

fn shell(script: &str) -> ProcessConfig {
    ProcessConfig::new("/bin/sh")
        .with_arg("-c")
        .with_arg(script)
        .with_arg("abstract-cli")
}

fn call(args: &[&str]) -> CliCall {
    CliCall::new(CliCommand::new(args.iter().copied()))
}

#[tokio::test]
async fn test_stdout_json_is_parsed() {
    let transport = CliTransport::new(shell(r#"printf '{"data":{"id":"p-1"}}'"#));
    let envelope = transport.execute(call(&["project", "load"])).await.unwrap();

    assert_eq!(envelope.meta.exit_code, Some(0));
    assert_eq!(envelope.meta.status, None);
    assert_eq!(envelope.into_payload(), json!({"id": "p-1"}));
}

#[tokio::test]
async fn test_argument_vector_is_passed_verbatim() {
    let transport = CliTransport::new(shell(r#"printf '{"args":"%s","count":%d}' "$*" "$#""#));
    let command = CliCommand::new(["projects", "list"])
        .flag("organization-id", "o 1")
        .switch("archived");

    let payload = transport
        .execute(CliCall::new(command))
        .await
        .unwrap()
        .into_payload();

    assert_eq!(
        payload,
        json!({
            "args": "projects list --organization-id o 1 --archived",
            "count": 5
        })
    );
}

#[tokio::test]
async fn test_empty_stdout_is_void() {
    let transport = CliTransport::new(shell("exit 0"));
    let envelope = transport.execute(call(&["project", "delete"])).await.unwrap();

    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn test_non_zero_exit_carries_stderr() {
    let transport = CliTransport::new(shell("printf boom >&2; exit 1"));
    let err = transport.execute(call(&["project", "load"])).await.unwrap_err();

    assert_matches!(
        err,
        TransportError::ProcessExit { code: 1, ref stderr } if stderr == "boom"
    );
}

#[tokio::test]
async fn test_stderr_is_kept_verbatim() {
    let transport = CliTransport::new(shell("printf 'boom\\n  at line 3\\n' >&2; exit 4"));
    let err = transport.execute(call(&["project", "load"])).await.unwrap_err();

    assert_matches!(
        err,
        TransportError::ProcessExit { code: 4, ref stderr } if stderr == "boom\n  at line 3\n"
    );
}

#[tokio::test]
async fn test_malformed_stdout() {
    let transport = CliTransport::new(shell("echo 'not json'"));
    let err = transport.execute(call(&["projects", "list"])).await.unwrap_err();

    assert_matches!(err, TransportError::MalformedResponse(_));
}

#[tokio::test]
async fn test_missing_executable_is_spawn_error() {
    let transport = CliTransport::new(ProcessConfig::new("/nonexistent/abstract-cli"));
    let err = transport.execute(call(&["projects", "list"])).await.unwrap_err();

    assert_matches!(err, TransportError::ProcessSpawn(ref msg) if msg.contains("/nonexistent/abstract-cli"));
}

#[tokio::test]
async fn test_hung_process_times_out() {
    let transport = CliTransport::new(shell("sleep 30"));
    let start = Instant::now();
    let err = transport
        .execute(call(&["projects", "list"]).with_timeout(Some(Duration::from_millis(200))))
        .await
        .unwrap_err();

    assert_matches!(err, TransportError::ProcessTimeout { timeout } if timeout == Duration::from_millis(200));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_default_timeout_comes_from_config() {
    let transport =
        CliTransport::new(shell("sleep 30").with_timeout(Duration::from_millis(150)));
    let err = transport.execute(call(&["projects", "list"])).await.unwrap_err();

    assert_matches!(err, TransportError::ProcessTimeout { .. });
}

#[tokio::test]
async fn test_background_process_holding_pipes_times_out() {
    let transport = CliTransport::new(
        shell("sleep 8 & printf '{}'").with_timeout(Duration::from_millis(500)),
    );

    let started = Instant::now();
    let err = transport.execute(call(&["projects", "list"])).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_matches!(err, TransportError::ProcessTimeout { timeout } if timeout == Duration::from_millis(500));
}

#[tokio::test]
async fn test_large_output_on_both_streams_does_not_deadlock() {
    // Both streams exceed a pipe buffer before the process exits
    let script = r#"
        head -c 200000 /dev/zero | tr '\0' e >&2
        printf '{"blob":"'
        head -c 200000 /dev/zero | tr '\0' b
        printf '"}'
    "#;
    let transport = CliTransport::new(shell(script).with_timeout(Duration::from_secs(20)));
    let payload = transport
        .execute(call(&["projects", "export"]))
        .await
        .unwrap()
        .into_payload();

    assert_eq!(payload["blob"].as_str().map(str::len), Some(200_000));
}

#[tokio::test]
async fn test_token_reaches_child_environment() {
    let config = shell(r#"printf '{"token":"%s"}' "$ABSTRACT_TOKEN""#)
        .with_auth_token(SecretString::new("cli-token".into()))
        .with_isolated_env();
    let payload = CliTransport::new(config)
        .execute(call(&["whoami"]))
        .await
        .unwrap()
        .into_payload();

    assert_eq!(payload, json!({"token": "cli-token"}));
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let transport = CliTransport::new(shell(r#"printf '{"n":%s}' "$1""#));
    let calls = (0..8).map(|n| {
        let transport = transport.clone();
        tokio::spawn(async move {
            transport
                .execute(CliCall::new(CliCommand::new([n.to_string()])))
                .await
                .map(|e| e.into_payload())
        })
    });

    for (n, handle) in calls.collect::<Vec<_>>().into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().unwrap(), json!({ "n": n }));
    }
}
