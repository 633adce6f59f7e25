// src/execute/mod.rs

//! The execution proxy: resolve the runtime pair for the chosen
//! language, forward code and stdin to the remote execution service,
//! and report whatever it said, verbatim.

pub mod piston;

use crate::languages::runtime_for;
use piston::{ExecuteError, PistonClient};

/* ---------------- request / outcome ---------------- */

/// One remote-execution request as submitted by a front end.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: String,
    pub stdin: String,
}

impl ExecutionRequest {
    /// The verify variant: same code, empty stdin. Exists purely to
    /// surface compile and parse errors before a real run.
    pub fn verify(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            stdin: String::new(),
        }
    }

    pub fn run(
        code: impl Into<String>,
        language: impl Into<String>,
        stdin: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            stdin: stdin.into(),
        }
    }
}

/// What the execution service reported for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The program ran. Output is unedited service output.
    Run {
        stdout: String,
        stderr: String,
        code: Option<i32>,
    },
    /// The service refused the request without running anything,
    /// e.g. an unknown runtime pair.
    Rejected { message: String },
}

impl ExecutionOutcome {
    /// Render for a terminal: rejection first, then stderr when
    /// present, then stdout. The program's own text is never rewritten.
    pub fn display(&self) -> String {
        match self {
            ExecutionOutcome::Rejected { message } => format!("Error: {message}"),
            ExecutionOutcome::Run { stderr, .. } if !stderr.is_empty() => {
                format!("Execution error:\n{stderr}")
            }
            ExecutionOutcome::Run { stdout, .. } => format!("> Output:\n{stdout}"),
        }
    }
}

/* ---------------- proxy ---------------- */

/// Resolve the runtime and perform the single outbound call. No retry:
/// whatever the service answers is the answer.
pub async fn run_execution(
    client: &PistonClient,
    req: &ExecutionRequest,
) -> Result<ExecutionOutcome, ExecuteError> {
    let runtime = runtime_for(&req.language);
    client.execute(&runtime, &req.code, &req.stdin).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::spawn_stub;
    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn client_for(addr: std::net::SocketAddr) -> PistonClient {
        PistonClient::new(reqwest::Client::new(), format!("http://{addr}"))
    }

    #[tokio::test]
    async fn hello_run_round_trips_to_displayed_output() {
        let app = Router::new().route(
            "/execute",
            post(|| async {
                Json(json!({"run": {"stdout": "hi\n", "stderr": "", "code": 0}}))
            }),
        );
        let addr = spawn_stub(app).await;

        let outcome = run_execution(
            &client_for(addr),
            &ExecutionRequest::run("print('hi')", "python", ""),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            ExecutionOutcome::Run {
                stdout: "hi\n".to_string(),
                stderr: String::new(),
                code: Some(0),
            }
        );
        assert!(outcome.display().contains("hi"));
    }

    #[tokio::test]
    async fn unrecognized_language_falls_back_to_default_runtime() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let app = Router::new()
            .route(
                "/execute",
                post(
                    |State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                        *seen.lock().unwrap() = Some(body);
                        Json(json!({"run": {"stdout": "", "stderr": "", "code": 0}}))
                    },
                ),
            )
            .with_state(seen.clone());
        let addr = spawn_stub(app).await;

        run_execution(
            &client_for(addr),
            &ExecutionRequest::verify("puts 'hi'", "ruby"),
        )
        .await
        .unwrap();

        let body = seen.lock().unwrap().clone().expect("stub saw a request");
        assert_eq!(body["language"], "python");
        assert_eq!(body["version"], "3.10.0");
    }

    #[tokio::test]
    async fn verify_variant_sends_empty_stdin() {
        let req = ExecutionRequest::verify("x = 1", "python");
        assert_eq!(req.stdin, "");
    }

    #[test]
    fn display_prefers_rejection_then_stderr_then_stdout() {
        let rejected = ExecutionOutcome::Rejected {
            message: "runtime is unknown".to_string(),
        };
        assert_eq!(rejected.display(), "Error: runtime is unknown");

        let failed = ExecutionOutcome::Run {
            stdout: "partial\n".to_string(),
            stderr: "Traceback (most recent call last)".to_string(),
            code: Some(1),
        };
        assert!(failed.display().starts_with("Execution error:\n"));
        assert!(failed.display().contains("Traceback"));

        let passed = ExecutionOutcome::Run {
            stdout: "done\n".to_string(),
            stderr: String::new(),
            code: Some(0),
        };
        assert!(passed.display().contains("done"));
    }
}
