// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Wire envelopes of the OPA data API.

use serde::Serialize;
use serde_json::{Map, Value};

/// Prefix of the data API, placed between the base URL and the rule path.
pub const DATA_API_PREFIX: &str = "/v1/data";

pub(crate) const RESULT_FIELD: &str = "result";

/// `{"input": ...}` request body.
#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a, T: ?Sized> {
    pub input: &'a T,
}

/// `{"result": ...}` response body.
///
/// Kept as a raw object so that a missing `result` (undefined document) can be
/// told apart from an explicit `null`.
pub(crate) type QueryResponse = Map<String, Value>;
