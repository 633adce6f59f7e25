// src/console.rs

//! The interactive console, a terminal rendition of the browser page.
//!
//! One command per line. A line that does not start with ':' is a
//! prompt submission; everything else is a colon command. Actions run
//! one at a time, each awaited before the next line is read, and all
//! of them drive the same [`SessionState`] the page semantics are
//! modeled on.
//!
//! Status and prompts go to STDERR; generated code and program output
//! go to STDOUT, so both can be piped cleanly.

use crate::config::Config;
use crate::execute::piston::PistonClient;
use crate::execute::{run_execution, ExecutionRequest};
use crate::generate::{generate_once, GenerateError, GenerationRequest};
use crate::languages::Language;
use crate::session::SessionState;
use crate::util::{read_to_string, write_string};

use anyhow::Result;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/* ---------------- commands ---------------- */

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain line: submit as a generation prompt.
    Submit(String),
    Lang(String),
    Simple,
    Code(PathBuf),
    Stdin(String),
    Verify,
    Run,
    Show,
    Save(PathBuf),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if !trimmed.starts_with(':') {
            return Command::Submit(trimmed.to_string());
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            ":lang" => Command::Lang(rest.to_string()),
            ":simple" => Command::Simple,
            ":code" => Command::Code(PathBuf::from(rest)),
            ":stdin" => Command::Stdin(unescape_newlines(rest)),
            ":verify" => Command::Verify,
            ":run" => Command::Run,
            ":show" => Command::Show,
            ":save" => Command::Save(PathBuf::from(rest)),
            ":help" => Command::Help,
            ":quit" | ":q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Console lines are single lines; `\n` in a :stdin argument stands
/// for a real newline so multi-line program input stays possible.
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/* ---------------- loop ---------------- */

pub async fn run(config: Config) -> Result<()> {
    let http = reqwest::Client::new();
    let piston = PistonClient::new(http.clone(), config.execution.base_url.clone());
    let mut state = SessionState::new();

    eprintln!("promptrun console");
    eprintln!("type a prompt to generate code, :help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("{}> ", state.language.display_name().to_lowercase());

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => print_help(),

            Command::Lang(name) => match Language::parse(&name) {
                Some(lang) => state.set_language(lang),
                None => eprintln!(
                    "unknown language {:?}; supported: {}",
                    name,
                    supported_list()
                ),
            },

            Command::Simple => {
                let on = state.toggle_simple();
                eprintln!("simple mode {}", if on { "on" } else { "off" });
            }

            Command::Code(path) => {
                if path.as_os_str().is_empty() {
                    eprintln!("usage: :code <file>");
                } else {
                    match read_to_string(&path) {
                        Ok(code) => {
                            state.edit_code(code);
                            eprintln!("loaded {} into the code buffer", path.display());
                        }
                        Err(e) => eprintln!("error: {e:#}"),
                    }
                }
            }

            Command::Stdin(text) => {
                state.edit_stdin(text);
                eprintln!("stdin buffer set ({} bytes)", state.stdin_buffer.len());
            }

            Command::Show => {
                if state.code_buffer.is_empty() {
                    eprintln!("code buffer is empty");
                } else {
                    println!("{}", state.code_buffer);
                }
            }

            Command::Save(path) => {
                if path.as_os_str().is_empty() {
                    eprintln!("usage: :save <file>");
                } else if state.code_buffer.is_empty() {
                    eprintln!("code buffer is empty; nothing to save");
                } else {
                    match write_string(&path, &state.code_buffer) {
                        Ok(()) => eprintln!("saved code buffer to {}", path.display()),
                        Err(e) => eprintln!("error: {e:#}"),
                    }
                }
            }

            Command::Submit(prompt) => submit(&mut state, &http, &config, prompt).await,
            Command::Verify => execute(&mut state, &piston, String::new()).await,
            Command::Run => {
                let stdin = state.stdin_buffer.clone();
                execute(&mut state, &piston, stdin).await;
            }

            Command::Unknown(name) => {
                eprintln!("unknown command {name}; :help lists commands");
            }
        }
    }

    Ok(())
}

fn print_help() {
    eprintln!("commands:");
    eprintln!("  <prompt>         generate code for the prompt");
    eprintln!("  :lang <name>     select language ({})", supported_list());
    eprintln!("  :simple          toggle simple mode (linear programs, input up front)");
    eprintln!("  :code <file>     load a file into the code buffer");
    eprintln!("  :stdin <text>    set program input (\\n for newlines)");
    eprintln!("  :verify          execute with empty stdin to surface compile errors");
    eprintln!("  :run             execute with the stdin buffer");
    eprintln!("  :show            print the code buffer");
    eprintln!("  :save <file>     write the code buffer to a file");
    eprintln!("  :quit            leave the console");
}

fn supported_list() -> String {
    Language::all()
        .iter()
        .map(|l| l.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/* ---------------- actions ---------------- */

async fn submit(
    state: &mut SessionState,
    http: &reqwest::Client,
    config: &Config,
    prompt: String,
) {
    state.set_prompt(prompt);
    let ticket = state.begin_generation();

    let req = GenerationRequest {
        prompt: state.prompt.clone(),
        language: state.language.display_name().to_string(),
        simple_mode: state.simple_mode,
    };

    let outcome = generate_once(http, &config.generation, &req)
        .await
        .map_err(|e| user_message(&e));

    if state.absorb_generation(ticket, outcome) {
        match (&state.last_result, &state.last_error) {
            (Some(result), _) => {
                println!("{}", result.code);
                eprintln!("(:verify to check it, :run to execute with stdin)");
            }
            (None, Some(err)) => eprintln!("error: {err}"),
            _ => {}
        }
    }
}

/// Rate limits get an explicit retry hint; everything else is shown
/// as reported.
fn user_message(err: &GenerateError) -> String {
    if err.is_rate_limited() {
        format!("{err}; try again later")
    } else {
        err.to_string()
    }
}

async fn execute(state: &mut SessionState, piston: &PistonClient, stdin: String) {
    if state.code_buffer.trim().is_empty() {
        eprintln!("nothing to run yet; submit a prompt or load a file with :code");
        return;
    }

    let ticket = state.begin_execution();
    let req = ExecutionRequest {
        code: state.code_buffer.clone(),
        language: state.language.display_name().to_lowercase(),
        stdin,
    };

    let outcome = run_execution(piston, &req).await.map_err(|e| e.to_string());

    if state.absorb_execution(ticket, outcome) {
        match (&state.last_outcome, &state.last_error) {
            (Some(out), _) => println!("{}", out.display()),
            (None, Some(err)) => eprintln!("error: {err}"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_prompt_submissions() {
        assert_eq!(
            Command::parse("reverse a string"),
            Command::Submit("reverse a string".to_string())
        );
        assert_eq!(
            Command::parse("  padded prompt  "),
            Command::Submit("padded prompt".to_string())
        );
    }

    #[test]
    fn colon_commands_parse_with_arguments() {
        assert_eq!(Command::parse(":lang java"), Command::Lang("java".to_string()));
        assert_eq!(
            Command::parse(":code  dir/prog.py"),
            Command::Code(PathBuf::from("dir/prog.py"))
        );
        assert_eq!(
            Command::parse(":save out.py"),
            Command::Save(PathBuf::from("out.py"))
        );
        assert_eq!(Command::parse(":simple"), Command::Simple);
        assert_eq!(Command::parse(":verify"), Command::Verify);
        assert_eq!(Command::parse(":run"), Command::Run);
        assert_eq!(Command::parse(":q"), Command::Quit);
    }

    #[test]
    fn stdin_argument_unescapes_newlines() {
        assert_eq!(
            Command::parse(r":stdin 5\n3"),
            Command::Stdin("5\n3".to_string())
        );
    }

    #[test]
    fn blank_and_unknown_lines_are_distinguished() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(
            Command::parse(":frobnicate now"),
            Command::Unknown(":frobnicate".to_string())
        );
    }

    #[test]
    fn rate_limit_message_suggests_retrying_later() {
        let err = GenerateError::RateLimited("quota exhausted".to_string());
        let message = user_message(&err);
        assert!(message.contains("try again later"));
        assert!(message.contains("quota exhausted"));

        let other = GenerateError::Upstream("boom".to_string());
        assert!(!user_message(&other).contains("try again later"));
    }
}
