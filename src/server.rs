// src/server.rs

use crate::config::Config;
use crate::execute::piston::PistonClient;
use crate::execute::{run_execution, ExecutionOutcome, ExecutionRequest};
use crate::generate::{generate_once, GenerateError, GenerationRequest};
use crate::page;
use crate::request_id::RequestId;

use axum::debug_handler;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Span;

/* ---------------- state ---------------- */

/// Shared across handlers. The reqwest client is reused for both
/// upstreams; config is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
        }
    }
}

/* ---------------- server ---------------- */

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/generate", post(api_generate))
        .route("/api/execute", post(api_execute))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %RequestId::default(),
                    )
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::info!(
                        status = res.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "request completed"
                    );
                }),
        )
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let socket: SocketAddr = config.server.addr.parse()?;
    let listener = TcpListener::bind(socket).await?;

    tracing::info!("promptrun listening on http://{}", socket);

    axum::serve(listener, app(AppState::new(config))).await?;
    Ok(())
}

/* ---------------- request models ---------------- */

#[derive(Debug, Deserialize)]
struct GenerateBody {
    prompt: String,
    language: String,
    #[serde(rename = "simpleMode", default)]
    simple_mode: bool,
}

#[derive(Debug, Deserialize)]
struct ExecuteBody {
    code: String,
    language: String,
    #[serde(default)]
    stdin: String,
}

/* ---------------- endpoints ---------------- */

async fn health() -> &'static str {
    "ok"
}

async fn index() -> Html<&'static str> {
    Html(page::index_html())
}

#[debug_handler]
async fn api_generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> impl IntoResponse {
    let req = GenerationRequest {
        prompt: body.prompt,
        language: body.language,
        simple_mode: body.simple_mode,
    };

    let response: Response = match generate_once(&state.http, &state.config.generation, &req).await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),

        Err(e) => (
            generate_status(&e),
            Json(serde_json::json!({
                "error": e.to_string(),
            })),
        )
            .into_response(),
    };

    response
}

/// Map the generation taxonomy onto status codes: the caller's fault
/// is 400, quota exhaustion is 429, everything else is 500.
fn generate_status(err: &GenerateError) -> StatusCode {
    if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else if err.is_rate_limited() {
        StatusCode::TOO_MANY_REQUESTS
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[debug_handler]
async fn api_execute(
    State(state): State<AppState>,
    Json(body): Json<ExecuteBody>,
) -> impl IntoResponse {
    let client = PistonClient::new(state.http.clone(), state.config.execution.base_url.clone());
    let req = ExecutionRequest {
        code: body.code,
        language: body.language,
        stdin: body.stdin,
    };

    // Outcomes pass through in the execution service's own shape; the
    // page distinguishes {run} from {message} exactly as it would
    // talking to the service directly.
    let response: Response = match run_execution(&client, &req).await {
        Ok(ExecutionOutcome::Run {
            stdout,
            stderr,
            code,
        }) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "run": { "stdout": stdout, "stderr": stderr, "code": code },
            })),
        )
            .into_response(),

        Ok(ExecutionOutcome::Rejected { message }) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": message,
            })),
        )
            .into_response(),

        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "error": e.to_string(),
            })),
        )
            .into_response(),
    };

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::spawn_stub;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stand up the real router against stub upstreams and return its
    /// address.
    async fn serve_app(config: Config) -> SocketAddr {
        spawn_stub(app(AppState::new(config))).await
    }

    /// The counter reports how many requests actually reached the
    /// chat stub, so rejection tests can assert nothing went out.
    fn chat_success_stub(text: &'static str) -> (Router, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/chat/completions",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "choices": [{"message": {"content": text}}]
                    }))
                }
            }),
        );
        (app, hits)
    }

    fn chat_rate_limited_stub() -> Router {
        Router::new().route(
            "/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "rate limit reached"}})),
                )
            }),
        )
    }

    async fn config_with_chat(stub: Router, key_env: &str) -> Config {
        let chat_addr = spawn_stub(stub).await;
        let mut config = Config::default();
        config.generation.base_url = format!("http://{chat_addr}");
        config.generation.api_key_env = key_env.to_string();
        config.generation.models = vec!["m1".to_string()];
        config
    }

    #[tokio::test]
    async fn generate_round_trip_returns_clean_code() {
        std::env::set_var("PROMPTRUN_TEST_SRV_GEN_KEY", "k");
        let (stub, hits) = chat_success_stub("```python\nprint('hello')\n```");
        let config = config_with_chat(stub, "PROMPTRUN_TEST_SRV_GEN_KEY").await;
        let addr = serve_app(config).await;

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/api/generate"))
            .json(&json!({"prompt": "print hello", "language": "Python", "simpleMode": true}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["code"], "print('hello')");
        assert_eq!(body["language"], "python");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generate_rejects_empty_prompt_with_400() {
        std::env::set_var("PROMPTRUN_TEST_SRV_EMPTY_KEY", "k");
        let (stub, hits) = chat_success_stub("unused");
        let config = config_with_chat(stub, "PROMPTRUN_TEST_SRV_EMPTY_KEY").await;
        let addr = serve_app(config).await;

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/api/generate"))
            .json(&json!({"prompt": "   ", "language": "python"}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "prompt must not be empty");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generate_rejects_unknown_language_with_400() {
        std::env::set_var("PROMPTRUN_TEST_SRV_LANG_KEY", "k");
        let (stub, hits) = chat_success_stub("unused");
        let config = config_with_chat(stub, "PROMPTRUN_TEST_SRV_LANG_KEY").await;
        let addr = serve_app(config).await;

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/api/generate"))
            .json(&json!({"prompt": "hi", "language": "fortran"}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generate_reports_missing_key_as_500() {
        let (stub, hits) = chat_success_stub("unused");
        let config = config_with_chat(stub, "PROMPTRUN_TEST_SRV_KEY_NEVER_SET").await;
        let addr = serve_app(config).await;

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/api/generate"))
            .json(&json!({"prompt": "hi", "language": "python"}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = res.json().await.unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("PROMPTRUN_TEST_SRV_KEY_NEVER_SET"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generate_reports_quota_exhaustion_as_429() {
        std::env::set_var("PROMPTRUN_TEST_SRV_RATE_KEY", "k");
        let config =
            config_with_chat(chat_rate_limited_stub(), "PROMPTRUN_TEST_SRV_RATE_KEY").await;
        let addr = serve_app(config).await;

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/api/generate"))
            .json(&json!({"prompt": "hi", "language": "python"}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
        let body: Value = res.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("rate limit reached"));
    }

    #[tokio::test]
    async fn execute_passes_run_report_through() {
        let exec_addr = spawn_stub(Router::new().route(
            "/execute",
            post(|| async { Json(json!({"run": {"stdout": "hi\n", "stderr": "", "code": 0}})) }),
        ))
        .await;

        let mut config = Config::default();
        config.execution.base_url = format!("http://{exec_addr}");
        let addr = serve_app(config).await;

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/api/execute"))
            .json(&json!({"code": "print('hi')", "language": "python", "stdin": ""}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["run"]["stdout"], "hi\n");
        assert_eq!(body["run"]["code"], 0);
    }

    #[tokio::test]
    async fn execute_passes_rejection_message_through() {
        let exec_addr = spawn_stub(Router::new().route(
            "/execute",
            post(|| async { Json(json!({"message": "runtime is unknown"})) }),
        ))
        .await;

        let mut config = Config::default();
        config.execution.base_url = format!("http://{exec_addr}");
        let addr = serve_app(config).await;

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/api/execute"))
            .json(&json!({"code": "x", "language": "python"}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "runtime is unknown");
    }

    #[tokio::test]
    async fn execute_reports_dead_upstream_as_502() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = listener.local_addr().unwrap();
        drop(listener);

        let mut config = Config::default();
        config.execution.base_url = format!("http://{dead}");
        let addr = serve_app(config).await;

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/api/execute"))
            .json(&json!({"code": "x", "language": "python"}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let addr = serve_app(Config::default()).await;

        let body = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn index_serves_the_page() {
        let addr = serve_app(Config::default()).await;

        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert!(body.contains("<html"));
        assert!(body.contains("promptrun"));
    }
}
