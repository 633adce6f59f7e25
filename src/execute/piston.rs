// src/execute/piston.rs

//! Outbound client for the Piston-style execution service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ExecutionOutcome;
use crate::languages::RuntimePair;

/// Ceiling for one remote run. The service enforces its own per-run
/// limits well below this; the timeout only catches a dead service.
pub const EXECUTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("execution service unreachable: {0}")]
    Transport(String),

    #[error("execution service returned an unreadable response: {0}")]
    Malformed(String),
}

/// Thin client for `POST {base}/execute`.
pub struct PistonClient {
    http: reqwest::Client,
    base_url: String,
}

impl PistonClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Submit one program. Service-level rejection and program-level
    /// failure both come back as outcomes, not errors; only transport
    /// and shape problems are `Err`.
    pub async fn execute(
        &self,
        runtime: &RuntimePair,
        code: &str,
        stdin: &str,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let body = ExecuteRequestBody {
            language: runtime.language,
            version: runtime.version,
            files: vec![ExecuteFile { content: code }],
            stdin,
        };

        tracing::debug!(language = runtime.language, version = runtime.version, "submitting program for execution");

        let response = self
            .http
            .post(format!("{}/execute", self.base_url))
            .timeout(EXECUTION_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|err| ExecuteError::Transport(err.to_string()))?;

        let payload: ExecuteResponseBody = response
            .json()
            .await
            .map_err(|err| ExecuteError::Malformed(err.to_string()))?;

        // A top-level message means the service refused the request
        // without running anything.
        if let Some(message) = payload.message {
            return Ok(ExecutionOutcome::Rejected { message });
        }
        match payload.run {
            Some(run) => Ok(ExecutionOutcome::Run {
                stdout: run.stdout,
                stderr: run.stderr,
                code: run.code,
            }),
            None => Err(ExecuteError::Malformed(
                "response carried neither run output nor a message".to_string(),
            )),
        }
    }
}

/* ---------------- wire types ---------------- */

#[derive(Serialize)]
struct ExecuteRequestBody<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<ExecuteFile<'a>>,
    stdin: &'a str,
}

#[derive(Serialize)]
struct ExecuteFile<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct ExecuteResponseBody {
    #[serde(default)]
    run: Option<RunReport>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct RunReport {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    code: Option<i32>,
}
