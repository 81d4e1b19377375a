//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;

use crate::bridge::{Bridge, BridgeResponse};
use crate::health::Health;
use crate::version::VersionInfo;

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: Health,
    pub executable: String,
    pub version: VersionInfo,
}

async fn health_check(State(bridge): State<Arc<Bridge>>) -> Json<HealthCheckResponse> {
    let executable = bridge.executable();
    Json(HealthCheckResponse {
        status: Health::of(executable),
        executable: executable.path().display().to_string(),
        version: VersionInfo::new(),
    })
}

async fn proxy(State(bridge): State<Arc<Bridge>>, body: Body) -> BridgeResponse {
    bridge.handle(body).await
}

pub fn routes(bridge: Arc<Bridge>) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        .route("/api/proxy", post(proxy))
        .with_state(bridge)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::bridge::BridgeConfig;
    use crate::executable::Executable;
    use crate::testutil::script;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_for(executable: &Executable) -> Router {
        routes(Arc::new(Bridge::new(BridgeConfig::new(executable.clone()))))
    }

    async fn response_bytes(response: axum::response::Response) -> axum::body::Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_slice(&response_bytes(response).await).unwrap()
    }

    fn proxy_request(body: &'static str) -> Request<Body> {
        Request::post("/api/proxy")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn health_check_ready_when_executable_present() {
        let child = script("exit 0");
        let app = app_for(&child.executable);

        let response = app
            .oneshot(Request::get("/health-check").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "READY");
        assert_eq!(
            json["executable"],
            child.executable.path().display().to_string()
        );
        assert!(json["version"]["procbridge"].is_string());
    }

    #[tokio::test]
    async fn health_check_unavailable_when_executable_missing() {
        let app = app_for(&Executable::from_path("/definitely/not/here/cli"));

        let response = app
            .oneshot(Request::get("/health-check").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "UNAVAILABLE");
    }

    #[tokio::test]
    async fn proxy_success_passes_stdout_through() {
        let child = script(r#"cat >/dev/null; printf '{"alive":true}'"#);
        let app = app_for(&child.executable);

        let response = app.oneshot(proxy_request(r#"{"ping":true}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(response_bytes(response).await.as_ref(), br#"{"alive":true}"#);
    }

    #[tokio::test]
    async fn proxy_does_not_reencode_stdout() {
        // Not JSON, trailing whitespace: must arrive untouched.
        let child = script("cat >/dev/null; printf 'not json \\n\\n'");
        let app = app_for(&child.executable);

        let response = app.oneshot(proxy_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_bytes(response).await.as_ref(), b"not json \n\n");
    }

    #[tokio::test]
    async fn proxy_failure_returns_500_with_code_and_stderr() {
        let child = script("cat >/dev/null; printf 'parse error' >&2; exit 1");
        let app = app_for(&child.executable);

        let response = app.oneshot(proxy_request("\"bad input\"")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        insta::assert_json_snapshot!(json, @r#"
        {
          "code": 1,
          "error": "child failed",
          "stderr": "parse error"
        }
        "#);
    }

    #[tokio::test]
    async fn proxy_misconfigured_executable_returns_proxy_error() {
        let app = app_for(&Executable::from_path("/definitely/not/here/cli"));

        let response = app.oneshot(proxy_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "proxy error");
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains("/definitely/not/here/cli")
        );
        assert!(json.get("code").is_none());
    }

    #[tokio::test]
    async fn proxy_accepts_any_content_type() {
        let child = script("cat");
        let app = app_for(&child.executable);

        let response = app
            .oneshot(
                Request::post("/api/proxy")
                    .header("content-type", "text/plain")
                    .body(Body::from("plain text body"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_bytes(response).await.as_ref(), b"plain text body");
    }

    #[tokio::test]
    async fn proxy_large_body_is_not_capped() {
        let child = script("wc -c | tr -d ' '");
        let app = app_for(&child.executable);
        let body = vec![b'b'; 8 * 1024 * 1024];

        let response = app
            .oneshot(Request::post("/api/proxy").body(Body::from(body)).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_bytes(response).await.as_ref(), b"8388608\n");
    }

    #[tokio::test]
    async fn proxy_rejects_get() {
        let child = script("exit 0");
        let app = app_for(&child.executable);

        let response = app
            .oneshot(Request::get("/api/proxy").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
