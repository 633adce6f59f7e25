// src/generate/mod.rs

//! The generation pipeline: validate → compose → fallback → sanitize.
//!
//! Everything here is request-scoped. The pipeline owns the error
//! taxonomy the boundaries map onto status codes: validation failures
//! are rejected before any outbound call, configuration problems fail
//! the single request (never the process), and upstream failures carry
//! the provider's message with rate limits kept distinct.

pub mod compose;
pub mod fallback;
pub mod invoker;
pub mod sanitize;

use serde::Serialize;
use thiserror::Error;

use crate::config::GenerationConfig;
use crate::languages::Language;
use compose::compose;
use fallback::{generate_with_fallback, FallbackError};
use invoker::{ChatCompletionsInvoker, InvokeError, ModelInvoker};
use sanitize::strip_code_fences;

/* ---------------- request / result ---------------- */

/// One code-generation request as submitted by a front end.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub language: String,
    pub simple_mode: bool,
}

impl GenerationRequest {
    /// Check the request invariants: non-empty trimmed prompt, language
    /// inside the recognized set. Runs before anything leaves the
    /// process.
    pub fn validate(&self) -> Result<Language, GenerateError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }
        Language::parse(&self.language)
            .ok_or_else(|| GenerateError::UnsupportedLanguage(self.language.trim().to_string()))
    }
}

/// Sanitized output of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub code: String,
    /// Lowercased echo of the requested language, as the original
    /// front end expects it.
    pub language: String,
}

/* ---------------- error taxonomy ---------------- */

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("unrecognized language: {0}")]
    UnsupportedLanguage(String),

    #[error("generation API key not configured (set {0})")]
    MissingApiKey(String),

    #[error("no model candidates configured")]
    NoModels,

    #[error("generation service rate limited the request: {0}")]
    RateLimited(String),

    #[error("{0}")]
    Upstream(String),
}

impl GenerateError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GenerateError::RateLimited(_))
    }

    /// Validation-class errors are the caller's fault (400-equivalent).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GenerateError::EmptyPrompt | GenerateError::UnsupportedLanguage(_)
        )
    }
}

impl From<FallbackError> for GenerateError {
    fn from(err: FallbackError) -> Self {
        match err {
            FallbackError::NoCandidates => GenerateError::NoModels,
            FallbackError::Exhausted { attempts, last } => match last {
                InvokeError::RateLimited { message } => GenerateError::RateLimited(message),
                other => GenerateError::Upstream(format!(
                    "all {attempts} model candidate(s) failed; last error: {other}"
                )),
            },
        }
    }
}

/* ---------------- pipeline ---------------- */

/// Run the full pipeline against an already-built invoker.
///
/// Validation happens first: an invalid request never reaches the
/// invoker (and therefore never produces an outbound call).
pub async fn run_generation(
    invoker: &dyn ModelInvoker,
    models: &[String],
    req: &GenerationRequest,
) -> Result<GenerationResult, GenerateError> {
    // 1) Validate before anything leaves the process
    let language = req.validate()?;

    // 2) Compose the instruction pair
    let instruction = compose(req.prompt.trim(), language, req.simple_mode);

    // 3) Walk the model ladder
    let raw = generate_with_fallback(invoker, models, &instruction).await?;

    // 4) Strip fences and echo the language back lowercased
    Ok(GenerationResult {
        code: strip_code_fences(&raw),
        language: req.language.trim().to_lowercase(),
    })
}

/// Run one generation with the configured chat-completions backend.
///
/// The API key is read from the environment on every call: a missing
/// key fails this request with a configuration error and nothing else.
pub async fn generate_once(
    http: &reqwest::Client,
    cfg: &GenerationConfig,
    req: &GenerationRequest,
) -> Result<GenerationResult, GenerateError> {
    // Validation precedes the env read so a bad request is always
    // reported as a bad request, not a server problem.
    req.validate()?;

    let api_key = read_api_key(cfg)?;
    let invoker = ChatCompletionsInvoker::new(
        http.clone(),
        cfg.base_url.clone(),
        api_key,
        cfg.temperature,
    );

    run_generation(&invoker, &cfg.models, req).await
}

fn read_api_key(cfg: &GenerationConfig) -> Result<String, GenerateError> {
    match std::env::var(&cfg.api_key_env) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GenerateError::MissingApiKey(cfg.api_key_env.clone())),
    }
}
