// src/session.rs

//! Mutable front-end state, owned by whichever surface drives it.
//!
//! Every field changes only through a named action, so the console and
//! the browser page share one state model. In-flight requests are
//! tracked with monotonic tickets: starting a request takes a ticket,
//! and a response is absorbed only while its ticket is still the
//! newest. A slow response can therefore never overwrite the outcome
//! of a later submission; it is dropped instead.

use crate::execute::ExecutionOutcome;
use crate::generate::GenerationResult;
use crate::languages::Language;

/// Opaque handle pairing a response with the submission that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct SessionState {
    pub prompt: String,
    pub language: Language,
    pub simple_mode: bool,
    pub last_result: Option<GenerationResult>,
    pub last_error: Option<String>,
    pub last_outcome: Option<ExecutionOutcome>,
    /// Seeded from the last successful generation, then edited freely.
    pub code_buffer: String,
    pub stdin_buffer: String,
    gen_ticket: u64,
    exec_ticket: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /* ---------------- edits ---------------- */

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Flip simple mode; returns the new value.
    pub fn toggle_simple(&mut self) -> bool {
        self.simple_mode = !self.simple_mode;
        self.simple_mode
    }

    /// Edit the code buffer. Does not touch the last result, which
    /// stays immutable once produced.
    pub fn edit_code(&mut self, code: impl Into<String>) {
        self.code_buffer = code.into();
    }

    pub fn edit_stdin(&mut self, stdin: impl Into<String>) {
        self.stdin_buffer = stdin.into();
    }

    /* ---------------- generation ---------------- */

    /// Start a generation: clears the previous result and error from
    /// the display and hands back the ticket the response must carry.
    pub fn begin_generation(&mut self) -> Ticket {
        self.gen_ticket += 1;
        self.last_error = None;
        self.last_result = None;
        Ticket(self.gen_ticket)
    }

    /// Absorb a generation response. Returns false when the ticket is
    /// stale, in which case the state is left untouched.
    pub fn absorb_generation(
        &mut self,
        ticket: Ticket,
        outcome: Result<GenerationResult, String>,
    ) -> bool {
        if ticket.0 != self.gen_ticket {
            tracing::debug!(ticket = ticket.0, newest = self.gen_ticket, "dropping stale generation response");
            return false;
        }
        match outcome {
            Ok(result) => {
                self.code_buffer = result.code.clone();
                self.last_result = Some(result);
                self.last_error = None;
            }
            Err(message) => self.last_error = Some(message),
        }
        true
    }

    /* ---------------- execution ---------------- */

    /// Start an execution: clears the previous outcome from the
    /// display and hands back the ticket the response must carry.
    pub fn begin_execution(&mut self) -> Ticket {
        self.exec_ticket += 1;
        self.last_outcome = None;
        Ticket(self.exec_ticket)
    }

    /// Absorb an execution response, with the same staleness rule as
    /// [`SessionState::absorb_generation`].
    pub fn absorb_execution(
        &mut self,
        ticket: Ticket,
        outcome: Result<ExecutionOutcome, String>,
    ) -> bool {
        if ticket.0 != self.exec_ticket {
            tracing::debug!(ticket = ticket.0, newest = self.exec_ticket, "dropping stale execution response");
            return false;
        }
        match outcome {
            Ok(result) => {
                self.last_outcome = Some(result);
                self.last_error = None;
            }
            Err(message) => self.last_error = Some(message),
        }
        true
    }
}
