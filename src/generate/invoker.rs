// src/generate/invoker.rs

//! One call to the generation service.
//!
//! The invoker performs exactly one HTTP POST per invocation and never
//! retries; trying the next model in the ladder is the fallback loop's
//! job. Rate-limit answers are kept distinct so the boundary can tell
//! "try again later" apart from a hard failure.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::generate::compose::Instruction;

/// Outcome of a single model attempt.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The service reported quota exhaustion (HTTP 429).
    #[error("generation service rate limited the request: {message}")]
    RateLimited { message: String },

    /// Any other failure: transport, non-success status, an error body,
    /// or a response with no usable text.
    #[error("generation attempt failed{}: {message}", fmt_status(.status))]
    Upstream { status: Option<u16>, message: String },
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {})", code),
        None => String::new(),
    }
}

impl InvokeError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, InvokeError::RateLimited { .. })
    }
}

/// A single, non-retrying call to a generation backend.
///
/// Trait seam so the fallback loop and pipeline can be exercised with
/// mock invokers in tests.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, model: &str, instruction: &Instruction) -> Result<String, InvokeError>;
}

/* ---------------- chat-completions client ---------------- */

/// Invoker for OpenAI-compatible `/chat/completions` endpoints.
pub struct ChatCompletionsInvoker {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    temperature: f32,
}

const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

impl ChatCompletionsInvoker {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: String,
        temperature: f32,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            temperature,
        }
    }

    fn headers(&self) -> Result<HeaderMap, InvokeError> {
        let mut headers = HeaderMap::new();

        let auth_val = format!("Bearer {}", self.api_key);
        let auth_val = HeaderValue::from_str(&auth_val).map_err(|_| InvokeError::Upstream {
            status: None,
            message: "API key contains characters not valid in a header".to_string(),
        })?;
        headers.insert(AUTHORIZATION, auth_val);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl ModelInvoker for ChatCompletionsInvoker {
    async fn invoke(&self, model: &str, instruction: &Instruction) -> Result<String, InvokeError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &instruction.system,
                },
                ChatMessage {
                    role: "user",
                    content: &instruction.user,
                },
            ],
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(url)
            .headers(self.headers()?)
            .json(&body)
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await
            .map_err(|e| InvokeError::Upstream {
                status: None,
                message: format!("request to generation service failed: {e}"),
            })?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(InvokeError::RateLimited {
                message: upstream_message(&text),
            });
        }

        if !status.is_success() {
            return Err(InvokeError::Upstream {
                status: Some(status.as_u16()),
                message: upstream_message(&text),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|_| InvokeError::Upstream {
                status: Some(status.as_u16()),
                message: "generation service returned invalid JSON".to_string(),
            })?;

        // Some providers put errors in a 200 body.
        if let Some(err) = parsed.error {
            return Err(InvokeError::Upstream {
                status: Some(status.as_u16()),
                message: err.message,
            });
        }

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| InvokeError::Upstream {
                status: Some(status.as_u16()),
                message: "generation response carried no text".to_string(),
            })
    }
}

/// Best-effort extraction of the provider's error message; falls back
/// to the raw body so nothing is swallowed.
fn upstream_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: UpstreamErrorBody,
    }

    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !envelope.error.message.is_empty() {
            return envelope.error.message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}

/* ---------------- wire models ---------------- */

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<UpstreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    message: String,
}
