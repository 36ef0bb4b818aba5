// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use opa_client::{PolicyClient, QueryContext};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::args::Cli;

/// What a completed query produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Decision(Value),
    /// The rule exists in no loaded policy or produced no value
    Undefined,
}

pub async fn run(cli: &Cli, cancellation: CancellationToken) -> Result<Outcome> {
    let config = cli.client_config()?;
    let input = cli.input_document()?;
    let client = PolicyClient::from_config(&config).context("Failed to create OPA client")?;

    let mut ctx = QueryContext::background().with_cancellation(cancellation);
    if let Some(timeout) = cli.timeout {
        ctx = ctx.with_timeout(timeout);
    }

    info!(base_url = %client.base_url(), path = %cli.path, "Querying OPA");
    match client.query::<_, Value>(&ctx, &cli.path, &input).await {
        Ok(decision) => Ok(Outcome::Decision(decision)),
        Err(err) if err.is_undefined() => {
            debug!(path = %cli.path, "Document undefined");
            Ok(Outcome::Undefined)
        }
        Err(err) => Err(err).with_context(|| format!("Query {} failed", cli.path)),
    }
}
