// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Prompt-to-code front end with remote execution.
///
/// `promptrun.yaml` is the primary source of truth when present.
/// CLI flags only override config values.
#[derive(Parser, Debug)]
#[command(
    name = "promptrun",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// All supported CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate code for a prompt and print it to stdout.
    ///
    /// The API key is read from the environment variable named in the
    /// config (GROQ_API_KEY by default).
    Generate {
        /// The natural-language prompt
        prompt: String,

        /// Target language
        ///
        /// Example:
        /// --language java
        #[arg(short, long, default_value = "python")]
        language: String,

        /// Ask for a simple, linear program (input up front, no menus)
        #[arg(long)]
        simple: bool,

        /// Write the code to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Path to config file
        ///
        /// Defaults to ./promptrun.yaml when present
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Execute a code file on the remote execution service.
    Exec {
        /// Path to the code file
        file: PathBuf,

        /// Language override
        ///
        /// Inferred from the file extension when omitted.
        #[arg(short, long)]
        language: Option<String>,

        /// Program input, inline
        ///
        /// Example:
        /// --stdin "5 3"
        #[arg(long)]
        stdin: Option<String>,

        /// Program input from a file (takes precedence over --stdin)
        #[arg(long)]
        stdin_file: Option<PathBuf>,

        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Interactive console: prompt in, code out, run remotely.
    Console {
        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Serve the browser front end and its JSON API.
    Serve {
        /// Listen address
        ///
        /// Example:
        /// --addr 0.0.0.0:3000
        #[arg(long)]
        addr: Option<String>,

        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the supported languages and their execution runtimes.
    Runtimes,

    /// Write a starter promptrun.yaml into the current directory.
    Init,
}
