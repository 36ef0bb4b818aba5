// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use url::Url;

use crate::config::{ConfigError, PolicyClientConfig};
use crate::context::{Cancelled, QueryContext};
use crate::error::{QueryError, ServiceErrorDetail};
use crate::executor::{BoxError, RequestExecutor};
use crate::types::{QueryRequest, QueryResponse, DATA_API_PREFIX, RESULT_FIELD};

const APPLICATION_JSON: &str = "application/json";

/// Client for querying an OPA instance.
///
/// Holds no per-query state; clone it or share it behind a reference to query
/// concurrently.
#[derive(Clone)]
pub struct PolicyClient {
    base_url: String,
    executor: Arc<dyn RequestExecutor>,
}

impl PolicyClient {
    /// Create a new client pointing at the OPA instance at `base_url`, using
    /// `executor` to perform HTTP requests. The URL is validated lazily.
    pub fn new(base_url: impl Into<String>, executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            base_url: base_url.into(),
            executor,
        }
    }

    /// Create a client backed by a default `reqwest::Client`.
    pub fn with_reqwest(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Arc::new(reqwest::Client::new()))
    }

    pub fn from_config(config: &PolicyClientConfig) -> Result<Self, ConfigError> {
        let http = config.build_http_client()?;
        Ok(Self::new(config.base_url.clone(), Arc::new(http)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query the rule at `path`, forwarding `input` as the OPA input document.
    ///
    /// `path = "/example/allow"` evaluates rule `allow` in package `example`.
    /// Exactly one request is sent; failures are never retried.
    ///
    /// A reply without a `result` member (OPA's answer for an undefined
    /// document) is returned as [`QueryError::UndefinedDocument`], even when `R`
    /// is an `Option`. Only an explicit `"result": null` decodes to `None`.
    pub async fn query<I, R>(&self, ctx: &QueryContext, path: &str, input: &I) -> Result<R, QueryError>
    where
        I: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = join_url(&self.base_url, path).map_err(|source| QueryError::InvalidUrl {
            base_url: self.base_url.clone(),
            source,
        })?;

        let body = serde_json::to_vec(&QueryRequest { input }).map_err(QueryError::Encode)?;
        let request = build_request(ctx, &url, body)?;

        debug!(url = %url, "querying OPA");
        let started = Instant::now();
        let (status, body) = self.exchange(ctx, request).await?;
        debug!(url = %url, status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "OPA responded");

        if status != StatusCode::OK {
            let detail = body
                .ok()
                .and_then(|bytes| serde_json::from_slice::<ServiceErrorDetail>(&bytes).ok());
            return Err(QueryError::Status { status, detail });
        }

        let bytes = body.map_err(|e| QueryError::Transport(e.into()))?;
        decode_result(path, &bytes)
    }

    /// Send `request` and read the whole reply, both under the context's
    /// cancellation token. A failed body read is handed back with the status
    /// so the caller decides whether it matters.
    async fn exchange(
        &self,
        ctx: &QueryContext,
        request: reqwest::Request,
    ) -> Result<(StatusCode, reqwest::Result<Bytes>), QueryError> {
        let exchange = async {
            let response = self.executor.execute(request).await?;
            let status = response.status();
            Ok::<_, BoxError>((status, response.bytes().await))
        };

        let outcome = match ctx.cancellation() {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(BoxError::from(Cancelled)),
                    outcome = exchange => outcome,
                }
            }
            None => exchange.await,
        };

        outcome.map_err(QueryError::Transport)
    }
}

impl std::fmt::Debug for PolicyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Join `base` + `/v1/data` + `path` into a single slash-normalised URL path.
fn join_url(base: &str, path: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if url.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
    }

    let segments = [url.path(), DATA_API_PREFIX, path]
        .iter()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    url.set_path(&format!("/{segments}"));

    Ok(url)
}

fn build_request(ctx: &QueryContext, url: &Url, body: Vec<u8>) -> Result<reqwest::Request, QueryError> {
    let request = http::Request::builder()
        .method(Method::POST)
        .uri(url.as_str())
        .header(CONTENT_TYPE, APPLICATION_JSON)
        .header(ACCEPT, APPLICATION_JSON)
        .body(body)
        .map_err(|e| QueryError::BuildRequest(e.into()))?;

    let mut request = reqwest::Request::try_from(request).map_err(|e| QueryError::BuildRequest(e.into()))?;
    if let Some(timeout) = ctx.timeout() {
        *request.timeout_mut() = Some(timeout);
    }

    Ok(request)
}

fn decode_result<R: DeserializeOwned>(path: &str, body: &[u8]) -> Result<R, QueryError> {
    let mut envelope: QueryResponse = serde_json::from_slice(body).map_err(QueryError::Decode)?;

    // OPA omits `result` entirely for undefined documents.
    let result = envelope
        .remove(RESULT_FIELD)
        .ok_or_else(|| QueryError::UndefinedDocument { path: path.to_string() })?;

    serde_json::from_value(result).map_err(QueryError::Decode)
}
