// src/languages.rs

//! The supported language set and its execution runtimes.
//!
//! One table serves two purposes:
//! - Generation requests must name a *recognized* language (aliases
//!   allowed); anything else is a validation error.
//! - Execution requests map a language name to the concrete
//!   (runtime, version) pair the execution service expects. Unknown
//!   names degrade to [`DEFAULT_RUNTIME`] instead of failing, so a
//!   hand-edited request still runs somewhere sensible.

use std::fmt;

/// A language the generator knows how to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    C,
    Cpp,
    Java,
    JavaScript,
    #[default]
    Python,
}

/// The (runtime, version) pair required by the execution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimePair {
    pub language: &'static str,
    pub version: &'static str,
}

/// Runtime used when an execution request names a language we do not
/// recognize. Degraded behavior by choice: the request still executes.
pub const DEFAULT_RUNTIME: RuntimePair = RuntimePair {
    language: "python",
    version: "3.10.0",
};

impl Language {
    /// Parse a user-supplied language name (case-insensitive, aliases
    /// allowed). Returns `None` for anything outside the supported set.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "c" => Some(Language::C),
            "cpp" | "c++" => Some(Language::Cpp),
            "java" => Some(Language::Java),
            "javascript" | "js" | "node" => Some(Language::JavaScript),
            "python" | "py" | "python3" => Some(Language::Python),
            _ => None,
        }
    }

    /// Canonical display name, used when composing instructions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
        }
    }

    /// The fixed runtime pair for this language.
    pub fn runtime(&self) -> RuntimePair {
        match self {
            Language::C => RuntimePair {
                language: "c",
                version: "10.2.0",
            },
            Language::Cpp => RuntimePair {
                language: "c++",
                version: "10.2.0",
            },
            Language::Java => RuntimePair {
                language: "java",
                version: "15.0.2",
            },
            Language::JavaScript => RuntimePair {
                language: "javascript",
                version: "18.15.0",
            },
            Language::Python => RuntimePair {
                language: "python",
                version: "3.10.0",
            },
        }
    }

    /// All supported languages, in display order.
    pub fn all() -> &'static [Language] {
        &[
            Language::C,
            Language::Cpp,
            Language::Java,
            Language::JavaScript,
            Language::Python,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Resolve a language name to its runtime pair.
///
/// Total function: unrecognized names fall back to [`DEFAULT_RUNTIME`]
/// with a warning rather than an error.
pub fn runtime_for(name: &str) -> RuntimePair {
    match Language::parse(name) {
        Some(lang) => lang.runtime(),
        None => {
            tracing::warn!(
                language = name,
                fallback = DEFAULT_RUNTIME.language,
                "unrecognized execution language, using default runtime"
            );
            DEFAULT_RUNTIME
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases_case_insensitively() {
        assert_eq!(Language::parse("Python"), Some(Language::Python));
        assert_eq!(Language::parse("py"), Some(Language::Python));
        assert_eq!(Language::parse("JS"), Some(Language::JavaScript));
        assert_eq!(Language::parse("c++"), Some(Language::Cpp));
        assert_eq!(Language::parse("  java "), Some(Language::Java));
        assert_eq!(Language::parse("cobol"), None);
        assert_eq!(Language::parse(""), None);
    }

    #[test]
    fn python_maps_to_fixed_runtime_pair() {
        let rt = runtime_for("python");
        assert_eq!(rt.language, "python");
        assert_eq!(rt.version, "3.10.0");
    }

    #[test]
    fn every_language_has_a_runtime_version() {
        for lang in Language::all() {
            assert!(!lang.runtime().version.is_empty());
        }
    }

    #[test]
    fn unrecognized_language_falls_back_to_default_runtime() {
        assert_eq!(runtime_for("banana"), DEFAULT_RUNTIME);
        assert_eq!(runtime_for(""), DEFAULT_RUNTIME);
    }

    #[test]
    fn cpp_runtime_uses_service_spelling() {
        // The execution service spells it "c++", not "cpp".
        assert_eq!(runtime_for("cpp").language, "c++");
    }
}
