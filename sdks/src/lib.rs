// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! OPA Rust SDK
//!
//! Typed access to the Open Policy Agent data API (`POST /v1/data/<path>`).
//!
//! ```ignore
//! use opa_client::{PolicyClient, QueryContext};
//!
//! let client = PolicyClient::with_reqwest("http://localhost:8181");
//! let allowed: bool = client
//!     .query(&QueryContext::background(), "/example/allow", &input)
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod types;

pub use client::PolicyClient;
pub use config::{ConfigError, PolicyClientConfig};
pub use context::{Cancelled, QueryContext};
pub use error::{QueryError, ServiceErrorDetail};
pub use executor::{BoxError, RequestExecutor};
