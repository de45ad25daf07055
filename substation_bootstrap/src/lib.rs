// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap
//!
//! The bootstrap crate sits **outside** `substation_core`/`substation_engine`
//! and provides everything the binary entry point needs before a pipeline
//! can run:
//!
//! - **Argument parsing** — secure CLI argument validation ([`cli`])
//! - **Shutdown coordination** — cancellation tokens propagated into the
//!   transform stage, with a grace period for in-flight capsules
//!   ([`shutdown`])
//! - **Bootstrap logging** — a minimal logging seam usable before the full
//!   `tracing` subscriber is installed ([`logger`])
//!
//! ## Usage
//!
//! ```no_run
//! use substation_bootstrap::{parse_and_validate, ValidatedCli};
//!
//! let cli: ValidatedCli = parse_and_validate().expect("invalid arguments");
//! ```

pub mod cli;
pub mod logger;
pub mod shutdown;

pub use cli::{parse_and_validate, ParseError, ValidatedCli, ValidatedCommand};
pub use logger::{BootstrapLogger, ConsoleLogger, NoOpLogger};
pub use shutdown::{CancellationToken, ShutdownCoordinator};
