// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;

use crate::context::Cancelled;
use crate::executor::BoxError;

/// Errors that can occur while querying OPA
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("could not create request url from {base_url:?}: {source}")]
    InvalidUrl {
        base_url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not encode OPA request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not create request: {0}")]
    BuildRequest(#[source] BoxError),

    #[error("error while performing request: {0}")]
    Transport(#[source] BoxError),

    #[error("request to OPA failed with status code {}{}", .status.as_u16(), DetailSuffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<ServiceErrorDetail>,
    },

    #[error("could not decode OPA response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("OPA document at {path:?} is undefined")]
    UndefinedDocument { path: String },
}

impl QueryError {
    /// HTTP status of a rejected query.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            QueryError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the rule exists in no loaded policy or produced no value.
    pub fn is_undefined(&self) -> bool {
        matches!(self, QueryError::UndefinedDocument { .. })
    }

    /// True when the query was aborted through its [`QueryContext`](crate::QueryContext).
    pub fn is_cancelled(&self) -> bool {
        match self {
            QueryError::Transport(source) => source.is::<Cancelled>(),
            _ => false,
        }
    }
}

/// Error object OPA returns alongside non-200 statuses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceErrorDetail {
    pub code: String,
    pub message: String,
}

impl fmt::Display for ServiceErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

struct DetailSuffix<'a>(&'a Option<ServiceErrorDetail>);

impl fmt::Display for DetailSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(detail) => write!(f, " ({detail})"),
            None => Ok(()),
        }
    }
}
