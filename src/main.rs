// src/main.rs

//! promptrun
//!
//! Entry point for the promptrun CLI.
//!
//! This binary turns natural-language prompts into source code via a
//! chat-completions API and runs that code on a remote execution
//! service. It delegates all real work to the `runner` module.
//!
//! Responsibilities of this file:
//! - Initialise logging and load .env
//! - Parse CLI arguments
//! - Hand off execution to the runner
//!
//! There is intentionally *no business logic* here.

mod cli;
mod config;
mod console;
mod execute;
mod generate;
mod languages;
mod page;
mod request_id;
mod runner;
mod server;
mod session;
mod util;

#[cfg(test)]
mod testutil;

use anyhow::Result;
use clap::Parser;

/// Program entry point.
///
/// Uses Tokio because every command awaits outbound HTTP calls, and
/// `serve` runs an axum server.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("promptrun=info".parse()?),
        )
        .init();

    // .env is optional; the only secret is the generation API key
    dotenvy::dotenv().ok();

    // Parse CLI arguments (generate / exec / console / serve / ...)
    let cli = cli::Cli::parse();

    // Delegate execution to the runner
    runner::run(cli).await
}
