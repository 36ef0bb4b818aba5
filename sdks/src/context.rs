// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Per-call cancellation and timeout signal.
///
/// The client does not enforce either itself: the timeout is attached to the
/// outgoing request for the transport to honour, and the token is raced
/// against the in-flight exchange.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    cancellation: Option<CancellationToken>,
    timeout: Option<Duration>,
}

impl QueryContext {
    /// A context that is never cancelled and carries no timeout.
    pub fn background() -> Self {
        Self::default()
    }

    /// Cancel the query when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Ask the transport to abort the exchange after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Transport-level cause reported when a [`QueryContext`] is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("query cancelled")]
pub struct Cancelled;
