//! Router and handlers

use super::dto::{QueryRequestDto, QueryResponseDto};
use super::error::ApiError;
use super::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tutor_application::QueryError;

/// Header carrying the caller's opaque access key.
pub const ACCESS_KEY_HEADER: &str = "x-api-key";

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/query", post(query))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static(ACCESS_KEY_HEADER),
        ])
}

/// POST /api/v1/query -- answer one question.
///
/// The request runs under a child of the shutdown token; dropping the
/// handler (client gone) cancels it.
async fn query(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<QueryRequestDto>, JsonRejection>,
) -> Result<Json<QueryResponseDto>, ApiError> {
    let Json(dto) = payload.map_err(|e| QueryError::InvalidRequest(e.body_text()))?;
    let access_key = headers
        .get(ACCESS_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let response = state
        .dispatcher
        .execute(dto.into_input(access_key), &cancel)
        .await?;
    Ok(Json(response.into()))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health -- liveness probe.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;
    use tutor_application::{
        ChatRequest, DispatchQueryUseCase, ExecutionParams, GatewayError, LlmGateway,
        NoSchoolContext, RunOrchestrationUseCase, ToolExecutorPort, ToolSchemaPort,
    };
    use tutor_domain::{
        KeywordGroundingPolicy, LlmResponse, ModelRegistry, ToolCall, ToolDefinition, ToolError,
        ToolResult, ToolSpec,
    };

    enum Behavior {
        Reply(&'static str),
        Fail(GatewayError),
        Hang,
    }

    struct StubGateway(Behavior);

    #[async_trait]
    impl LlmGateway for StubGateway {
        async fn complete(&self, _request: ChatRequest<'_>) -> Result<LlmResponse, GatewayError> {
            match &self.0 {
                Behavior::Reply(text) => Ok(LlmResponse::from_text(*text)),
                Behavior::Fail(e) => Err(e.clone()),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(LlmResponse::from_text("too late"))
                }
            }
        }
    }

    struct NoTools(ToolSpec);

    #[async_trait]
    impl ToolExecutorPort for NoTools {
        fn tool_spec(&self) -> &ToolSpec {
            &self.0
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            ToolResult::failure(&call.tool_name, ToolError::unsupported_tool(&call.tool_name))
        }
    }

    struct NoSchema;

    impl ToolSchemaPort for NoSchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
            serde_json::json!({ "name": tool.name })
        }
    }

    fn app_with(behavior: Behavior, execution: ExecutionParams) -> (Router, CancellationToken) {
        let orchestration = RunOrchestrationUseCase::new(
            Arc::new(StubGateway(behavior)),
            Arc::new(NoTools(ToolSpec::new())),
            Arc::new(NoSchema),
            Arc::new(ModelRegistry::builtin()),
            Arc::new(KeywordGroundingPolicy::default()),
        );
        let dispatcher =
            DispatchQueryUseCase::new(orchestration, Arc::new(NoSchoolContext), execution);
        let shutdown = CancellationToken::new();
        let state = AppState::new(Arc::new(dispatcher)).with_shutdown(shutdown.clone());
        (router(state), shutdown)
    }

    fn app(behavior: Behavior) -> Router {
        app_with(behavior, ExecutionParams::default().with_model_retries(0)).0
    }

    fn post_query(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/query")
            .header("content-type", "application/json")
            .header(ACCESS_KEY_HEADER, "school-key")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(Behavior::Reply("ok")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_query_success() {
        let request = post_query(serde_json::json!({
            "phoneNumber": "+351912345678",
            "question": "Quanto é 2+2?"
        }));
        let (status, body) = send(app(Behavior::Reply("2 + 2 = 4")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "2 + 2 = 4");
        assert_eq!(body["modelUsed"], "deepseek/deepseek-chat");
        assert_eq!(body["toolsUsed"], serde_json::json!([]));
        assert_eq!(body["canRespond"], true);
        assert_eq!(body["liveDataVerified"], true);
        assert!(body["processingTimeMs"].is_u64());
    }

    #[tokio::test]
    async fn test_empty_question_is_bad_request() {
        let request = post_query(serde_json::json!({
            "phoneNumber": "+351912345678",
            "question": "   "
        }));
        let (status, body) = send(app(Behavior::Reply("unused")), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");
        assert_eq!(body["canRespond"], false);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/query")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(Behavior::Reply("unused")), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let request = post_query(serde_json::json!({
            "phoneNumber": "+351912345678",
            "question": "Olá",
            "aiModel": "acme/unknown"
        }));
        let (status, body) = send(app(Behavior::Reply("unused")), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNKNOWN_MODEL");
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let request = post_query(serde_json::json!({
            "phoneNumber": "+351912345678",
            "question": "Explica a fotossíntese"
        }));
        let behavior = Behavior::Fail(GatewayError::RequestFailed("HTTP 401: secret detail".into()));
        let (status, body) = send(app(behavior), request).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "UPSTREAM_FAILURE");
        assert!(!body["error"].as_str().unwrap().contains("secret"));
    }

    #[tokio::test]
    async fn test_timeout_is_gateway_timeout() {
        let execution = ExecutionParams::default()
            .with_request_timeout(Duration::from_millis(20))
            .with_model_retries(0);
        let (app, _shutdown) = app_with(Behavior::Hang, execution);
        let request = post_query(serde_json::json!({
            "phoneNumber": "+351912345678",
            "question": "Explica a fotossíntese"
        }));
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["code"], "TIMEOUT");
    }

    #[tokio::test]
    async fn test_shutdown_cancels_request() {
        let (app, shutdown) = app_with(Behavior::Hang, ExecutionParams::default());
        shutdown.cancel();
        let request = post_query(serde_json::json!({
            "phoneNumber": "+351912345678",
            "question": "Explica a fotossíntese"
        }));
        let (status, body) = send(app, request).await;

        assert_eq!(status.as_u16(), 499);
        assert_eq!(body["code"], "CANCELLED");
    }
}
