// src/generate/compose.rs

//! Instruction composition for the generation service.
//!
//! Pure function of the request: a role framing ("expert coder in X")
//! plus a mode-specific directive. Simple mode pins the model to a
//! single linear program so beginners get something they can read top
//! to bottom; the default mode allows normal structure. Both modes end
//! with the no-fences demand, which the sanitizer backstops anyway.

use crate::languages::Language;

/// The system/user pair sent to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub system: String,
    pub user: String,
}

const SIMPLE_DIRECTIVE: &str = "CRITICAL: write a SIMPLE, LINEAR program. \
No loops, no menus, no retry prompts. Ask for all input once, up front. \
Output ONLY the code, with no markdown fences.";

const ROBUST_DIRECTIVE: &str = "Write a professional, robust program. \
Loops and functions are allowed. \
Output ONLY the code, with no markdown fences.";

/// Build the instruction pair for one generation request.
///
/// `prompt` is expected to be trimmed and non-empty; validation happens
/// before composition.
pub fn compose(prompt: &str, language: Language, simple_mode: bool) -> Instruction {
    let directive = if simple_mode {
        SIMPLE_DIRECTIVE
    } else {
        ROBUST_DIRECTIVE
    };

    Instruction {
        system: format!("Expert coder in {}. {}", language.display_name(), directive),
        user: prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_mode_forbids_loops_and_menus() {
        let ins = compose("sum two numbers", Language::Python, true);
        assert!(ins.system.contains("No loops"));
        assert!(ins.system.contains("no menus"));
        assert!(ins.system.contains("no markdown fences"));
    }

    #[test]
    fn robust_mode_does_not_forbid_loops() {
        let ins = compose("sum two numbers", Language::Python, false);
        assert!(!ins.system.contains("No loops"));
        assert!(!ins.system.contains("no menus"));
        assert!(ins.system.contains("no markdown fences"));
    }

    #[test]
    fn system_line_names_the_language() {
        let ins = compose("reverse a string", Language::Cpp, false);
        assert!(ins.system.starts_with("Expert coder in C++."));
    }

    #[test]
    fn user_line_is_the_prompt() {
        let ins = compose("print hello", Language::Java, true);
        assert_eq!(ins.user, "print hello");
    }
}
