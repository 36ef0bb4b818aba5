// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Request execution seam.
//!
//! [`PolicyClient`](crate::PolicyClient) never talks to the network itself; it
//! hands a fully prepared request to a [`RequestExecutor`]. The production
//! implementation is `reqwest::Client`, tests plug in mock servers or
//! in-memory doubles.

use async_trait::async_trait;
use reqwest::{Request, Response};

/// Boxed error reported by executors and request construction.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Performs a single HTTP exchange.
///
/// Implementations must be safe to call concurrently when the owning client
/// is shared between tasks.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute `request` and return the raw response, whatever its status.
    async fn execute(&self, request: Request) -> Result<Response, BoxError>;
}

#[async_trait]
impl RequestExecutor for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response, BoxError> {
        reqwest::Client::execute(self, request)
            .await
            .map_err(Into::into)
    }
}
