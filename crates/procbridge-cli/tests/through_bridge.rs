//! Runs the built `procbridge-cli` binary behind a real `Bridge`.

#![cfg(unix)]

use axum::body::Bytes;
use procbridge::{Bridge, BridgeConfig, BridgeResponse, Executable};

fn bridge() -> Bridge {
    Bridge::new(BridgeConfig::new(Executable::from_path(env!(
        "CARGO_BIN_EXE_procbridge-cli"
    ))))
}

#[tokio::test]
async fn ping_succeeds_with_pong() {
    let response = bridge()
        .run(Bytes::from_static(br#"{"ping":true,"timestamp":"now"}"#))
        .await;

    let BridgeResponse::Success { body } = response else {
        panic!("expected success, got {response:?}");
    };
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["pong"], true);
    assert_eq!(
        json["response"],
        "Pong! procbridge-cli is alive. Received at: now"
    );
    assert!(body.ends_with(b"\n"));
}

#[tokio::test]
async fn empty_body_is_treated_as_empty_object() {
    let response = bridge().run(Bytes::new()).await;

    let BridgeResponse::Success { body } = response else {
        panic!("expected success, got {response:?}");
    };
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["input"], serde_json::json!({}));
    assert_eq!(json["response"], "No specific message provided");
}

#[tokio::test]
async fn invalid_json_fails_with_code_1_and_reason_on_stderr() {
    let response = bridge().run(Bytes::from_static(b"{not json")).await;

    let BridgeResponse::Failure {
        program,
        code,
        stderr,
    } = &response
    else {
        panic!("expected failure, got {response:?}");
    };
    assert_eq!(program, "procbridge-cli");
    assert_eq!(*code, Some(1));
    let stderr = String::from_utf8_lossy(stderr);
    assert!(stderr.contains("input is not valid JSON"), "{stderr}");

    let body = response.error_body().unwrap();
    assert_eq!(body["error"], "procbridge-cli failed");
    assert_eq!(body["code"], 1);
}
