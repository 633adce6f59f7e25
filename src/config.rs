// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Conventional config filename, picked up from the working directory
/// when present. An explicitly passed path must exist; this one may
/// be absent, in which case built-in defaults apply.
pub const DEFAULT_CONFIG_FILE: &str = "promptrun.yaml";

/// Root configuration loaded from `promptrun.yaml`.
///
/// This file controls:
/// - Which generation endpoint and model ladder to use
/// - Which env var carries the generation API key
/// - Which execution service to submit programs to
/// - Where the embedded web server listens
///
/// The API key itself never lives in this file, only the name of the
/// environment variable that holds it.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Generation endpoint and model ladder
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Remote execution service
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Embedded web server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            execution: ExecutionConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Generation section.
///
/// Example in promptrun.yaml:
///
/// generation:
///   base_url: https://api.groq.com/openai/v1
///   api_key_env: GROQ_API_KEY
///   models:
///     - llama-3.3-70b-versatile
///     - llama-3.1-8b-instant
///   temperature: 0.1
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Chat-completions base URL (no trailing slash).
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the bearer key.
    /// Read once per request, never at startup.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Ordered model ladder; earlier entries are preferred.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_base_url(),
            api_key_env: default_api_key_env(),
            models: default_models(),
            temperature: default_temperature(),
        }
    }
}

fn default_generation_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "llama-3.3-70b-versatile".to_string(),
        "llama-3.1-8b-instant".to_string(),
        "gemma2-9b-it".to_string(),
    ]
}

fn default_temperature() -> f32 {
    0.1
}

/// Execution section.
///
/// Example:
///
/// execution:
///   base_url: https://emkc.org/api/v2/piston
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Execution service base URL (no trailing slash).
    #[serde(default = "default_execution_base_url")]
    pub base_url: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            base_url: default_execution_base_url(),
        }
    }
}

fn default_execution_base_url() -> String {
    "https://emkc.org/api/v2/piston".to_string()
}

/// Server section.
///
/// Example:
///
/// server:
///   addr: 127.0.0.1:8080
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address for `promptrun serve`.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

fn default_server_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl Config {
    /// Load and parse a config file from disk.
    ///
    /// This performs:
    /// - File read
    /// - YAML deserialization
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let cfg: Config =
            serde_yaml::from_str(&raw).context("Failed to parse YAML config")?;

        Ok(cfg)
    }

    /// Resolve configuration for a run. An explicitly named file must
    /// exist; the conventional `promptrun.yaml` is used when present
    /// in the working directory and silently skipped when not.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let conventional = Path::new(DEFAULT_CONFIG_FILE);
                if conventional.exists() {
                    Self::load(conventional)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
