//! The three response shapes and their HTTP rendering.

use axum::{
    body::Bytes,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};

use super::BridgeError;
use super::process::ExitOutcome;

/// Exactly one of these is produced per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeResponse {
    /// Child exited 0. `body` is its stdout, untouched.
    Success { body: Bytes },
    /// Child exited nonzero or was killed by a signal. Its stdout is discarded.
    Failure {
        program: String,
        code: Option<i32>,
        stderr: Vec<u8>,
    },
    /// The bridge itself failed; no exit code exists.
    InfraError { message: String },
}

impl BridgeResponse {
    pub fn from_outcome(program: impl Into<String>, outcome: ExitOutcome) -> Self {
        if outcome.is_success() {
            BridgeResponse::Success {
                body: Bytes::from(outcome.captured.stdout),
            }
        } else {
            BridgeResponse::Failure {
                program: program.into(),
                code: outcome.code,
                stderr: outcome.captured.stderr,
            }
        }
    }

    pub fn infra_error(err: &BridgeError) -> Self {
        BridgeResponse::InfraError {
            message: err.to_string(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeResponse::Success { .. } => "success",
            BridgeResponse::Failure { .. } => "failure",
            BridgeResponse::InfraError { .. } => "infra-error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeResponse::Success { .. } => StatusCode::OK,
            BridgeResponse::Failure { .. } | BridgeResponse::InfraError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON error body for the two error shapes; `None` for success, whose
    /// body is passed through raw.
    pub fn error_body(&self) -> Option<serde_json::Value> {
        match self {
            BridgeResponse::Success { .. } => None,
            BridgeResponse::Failure {
                program,
                code,
                stderr,
            } => Some(serde_json::json!({
                "code": code,
                "error": format!("{program} failed"),
                "stderr": String::from_utf8_lossy(stderr),
            })),
            BridgeResponse::InfraError { message } => Some(serde_json::json!({
                "error": "proxy error",
                "message": message,
            })),
        }
    }
}

impl IntoResponse for BridgeResponse {
    fn into_response(self) -> Response {
        match self {
            BridgeResponse::Success { body } => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            error => {
                let body = error.error_body().unwrap_or_default();
                (error.status_code(), Json(body)).into_response()
            }
        }
    }
}
