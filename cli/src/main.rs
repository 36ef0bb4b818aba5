// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # opa-query
//!
//! Evaluates a single rule against an Open Policy Agent instance and prints
//! the decision as JSON.
//!
//! ```text
//! opa-query /example/allow --input '{"age": 17}'
//! OPA_URL=http://opa:8181 opa-query /authz/allow --input-file request.json
//! ```
//!
//! Exit codes: 0 decision printed, 1 failure, 2 document undefined.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use opa_query::{run, Cli, Outcome};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    // Ctrl-C cancels the in-flight query
    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling query");
            on_interrupt.cancel();
        }
    });

    match run(&cli, cancellation).await? {
        Outcome::Decision(decision) => {
            let rendered = serde_json::to_string_pretty(&decision).context("Failed to render decision")?;
            println!("{rendered}");
            Ok(())
        }
        Outcome::Undefined => {
            eprintln!("{} {}", "undefined:".yellow(), cli.path);
            std::process::exit(2);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
