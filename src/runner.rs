// src/runner.rs

use crate::cli::{Cli, Command};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::console;
use crate::execute::piston::PistonClient;
use crate::execute::{run_execution, ExecutionOutcome, ExecutionRequest};
use crate::generate::{generate_once, GenerationRequest};
use crate::languages::Language;
use crate::server;
use crate::util::{read_to_string, write_string};

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Entry point from `main.rs`.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            prompt,
            language,
            simple,
            out,
            config,
        } => generate_cmd(prompt, language, simple, out, config).await,

        Command::Exec {
            file,
            language,
            stdin,
            stdin_file,
            config,
        } => exec_cmd(file, language, stdin, stdin_file, config).await,

        Command::Console { config } => {
            let cfg = Config::resolve(config.as_deref())?;
            console::run(cfg).await
        }

        Command::Serve { addr, config } => {
            let mut cfg = Config::resolve(config.as_deref())?;

            // CLI overrides
            if let Some(addr) = addr {
                cfg.server.addr = addr;
            }

            server::serve(cfg).await
        }

        Command::Runtimes => {
            print_runtimes();
            Ok(())
        }

        Command::Init => init_scaffold(),
    }
}

/* ---------------- one-shot generation ---------------- */

async fn generate_cmd(
    prompt: String,
    language: String,
    simple: bool,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let cfg = Config::resolve(config.as_deref())?;
    let http = reqwest::Client::new();

    let req = GenerationRequest {
        prompt,
        language,
        simple_mode: simple,
    };

    let result = generate_once(&http, &cfg.generation, &req).await?;

    match out {
        Some(path) => {
            write_string(&path, &result.code)?;
            eprintln!("Wrote {} code to {}", result.language, path.display());
        }
        None => println!("{}", result.code),
    }

    Ok(())
}

/* ---------------- one-shot execution ---------------- */

async fn exec_cmd(
    file: PathBuf,
    language: Option<String>,
    stdin: Option<String>,
    stdin_file: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let cfg = Config::resolve(config.as_deref())?;

    let code = read_to_string(&file)?;
    let language = match language {
        Some(l) => l,
        None => infer_language(&file)?,
    };
    let stdin_text = match stdin_file {
        Some(path) => read_to_string(&path)?,
        None => stdin.unwrap_or_default(),
    };

    let client = PistonClient::new(reqwest::Client::new(), cfg.execution.base_url.clone());
    let req = ExecutionRequest {
        code,
        language,
        stdin: stdin_text,
    };

    let outcome = run_execution(&client, &req).await?;
    println!("{}", outcome.display());

    // Mirror the program's fate in the exit status so scripts can
    // depend on it.
    match outcome {
        ExecutionOutcome::Rejected { .. } => bail!("Execution rejected"),
        ExecutionOutcome::Run { code: Some(c), .. } if c != 0 => {
            bail!("Program exited with status {}", c)
        }
        _ => Ok(()),
    }
}

/// Map a file extension to the execution language name.
///
/// Mirrors the page's language buttons; anything else needs an
/// explicit --language.
fn infer_language(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let language = match ext.as_str() {
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "c" => "c",
        "cpp" | "cc" | "cxx" => "c++",
        "java" => "java",
        _ => bail!(
            "Cannot infer language from extension {:?}; pass --language",
            ext
        ),
    };

    Ok(language.to_string())
}

/* ---------------- runtimes table ---------------- */

fn print_runtimes() {
    for lang in Language::all() {
        let rt = lang.runtime();
        println!("{:<12} {} {}", lang.display_name(), rt.language, rt.version);
    }
}

/* ---------------- init scaffold ---------------- */

fn init_scaffold() -> Result<()> {
    if !Path::new(DEFAULT_CONFIG_FILE).exists() {
        std::fs::write(DEFAULT_CONFIG_FILE, default_config_yaml())?;
        eprintln!("Created {}", DEFAULT_CONFIG_FILE);
    } else {
        eprintln!("{} already exists (skipping)", DEFAULT_CONFIG_FILE);
    }

    Ok(())
}

fn default_config_yaml() -> &'static str {
    r#"
generation:
  base_url: https://api.groq.com/openai/v1
  api_key_env: GROQ_API_KEY
  models:
    - llama-3.3-70b-versatile
    - llama-3.1-8b-instant
    - gemma2-9b-it
  temperature: 0.1

execution:
  base_url: https://emkc.org/api/v2/piston

server:
  addr: 127.0.0.1:8080
"#
}
