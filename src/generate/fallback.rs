// src/generate/fallback.rs

//! Ordered model fallback.
//!
//! Model availability is unreliable: versions get deprecated, quotas
//! differ per access tier, individual models go down. The loop walks a
//! fixed ordered candidate list and returns the first success. There is
//! no per-model retry and no backoff; the ladder *is* the whole retry
//! policy.

use thiserror::Error;

use crate::generate::compose::Instruction;
use crate::generate::invoker::{InvokeError, ModelInvoker};

/// Terminal outcome when no candidate produced text.
#[derive(Debug, Error)]
pub enum FallbackError {
    /// The candidate list was empty; nothing was attempted.
    #[error("no model candidates configured")]
    NoCandidates,

    /// Every candidate failed. Carries the attempt count and the last
    /// failure, which classifies the whole run (rate limit or not).
    #[error("all {attempts} model candidate(s) failed; last error: {last}")]
    Exhausted { attempts: usize, last: InvokeError },
}

/// Try each candidate model in order and return the first raw
/// generation. Failures accumulate only as the running last error;
/// exhaustion reports that error together with the attempt count.
pub async fn generate_with_fallback(
    invoker: &dyn ModelInvoker,
    models: &[String],
    instruction: &Instruction,
) -> Result<String, FallbackError> {
    let mut last: Option<InvokeError> = None;
    let mut attempts = 0usize;

    for model in models {
        attempts += 1;

        match invoker.invoke(model, instruction).await {
            Ok(text) => {
                tracing::debug!(model = model.as_str(), attempts, "model attempt succeeded");
                return Ok(text);
            }
            Err(err) => {
                tracing::warn!(
                    model = model.as_str(),
                    error = %err,
                    "model attempt failed, trying next candidate"
                );
                last = Some(err);
            }
        }
    }

    match last {
        Some(last) => Err(FallbackError::Exhausted { attempts, last }),
        None => Err(FallbackError::NoCandidates),
    }
}
