// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Substation Core
//!
//! Domain layer for the Substation pipeline engine: the pieces that decide
//! how records flow and how processors and conditions compose, independent
//! of any concrete runtime, registry, or I/O adapter.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  substation_engine                          │
//! │  (concrete inspectors/processors, registry, transform stage)│
//! └─────────────────────────────────────┬───────────────────────┘
//! ┌─────────────────────────────────────┴───────────────────────┐
//! │                   substation_core (this crate)               │
//! │  (Capsule, Inspector/Operator traits, Applier/Batcher traits,│
//! │   Config, SubstationError, MetricsPort)                      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Concepts
//!
//! - [`Capsule`] — the unit of data carried through a pipeline: raw bytes
//!   plus a lazily-resolved JSON facade.
//! - [`Inspector`] — a predicate over a capsule, composed by an [`Operator`].
//! - [`Applier`] / [`Batcher`] — the two processor flavors; appliers
//!   transform one capsule at a time, batchers reshape a whole batch.
//! - [`Config`] — the declarative `(type, settings)` pair every inspector and
//!   processor is built from.
//! - [`SubstationError`] — the sentinel error taxonomy shared across
//!   construction-time and per-record failures.

pub mod capsule;
pub mod config;
pub mod error;
pub mod inspector;
pub mod json_path;
pub mod metrics;
pub mod operator;
pub mod processor;

pub use capsule::Capsule;
pub use config::Config;
pub use error::SubstationError;
pub use inspector::{Inspector, InspectorBase};
pub use metrics::{MetricsData, MetricsPort};
pub use operator::{Operator, OperatorType};
pub use processor::{Applier, Batcher, ProcessorBase};
