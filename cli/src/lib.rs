// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! opa-query library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Argument handling and query execution for the `opa-query` binary

pub mod args;
pub mod run;

pub use args::Cli;
pub use run::{run, Outcome};
