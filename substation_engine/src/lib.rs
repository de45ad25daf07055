// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Substation Engine
//!
//! Concrete inspectors, processors, the declarative registry that builds
//! them from a pipeline document, and the transform stage runtime that
//! drives capsules through a pipeline's stages over bounded channels.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 infrastructure::runtime                     │
//! │   transform stage state machine, cancellation, channels     │
//! └─────────────────────────────────┬─────────────────────────────┘
//! ┌─────────────────────────────────┴─────────────────────────────┐
//! │            infrastructure::{inspectors,processors}           │
//! │         concrete Inspector/Applier/Batcher implementations   │
//! └─────────────────────────────────┬─────────────────────────────┘
//! ┌─────────────────────────────────┴─────────────────────────────┐
//! │                 infrastructure::registry                     │
//! │     builds trait objects from a declarative pipeline doc     │
//! └─────────────────────────────────┬─────────────────────────────┘
//! ┌─────────────────────────────────┴─────────────────────────────┐
//! │                      substation_core                         │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! `infrastructure::metrics` and `infrastructure::logging` provide the
//! ambient Prometheus and `tracing` wiring used regardless of which
//! pipeline document is loaded.

pub mod infrastructure;

pub use substation_core::{
    Applier, Batcher, Capsule, Config, Inspector, InspectorBase, MetricsData, MetricsPort,
    Operator, OperatorType, ProcessorBase, SubstationError,
};

pub use crate::infrastructure::registry::{build_applier, build_batcher, build_inspector, build_operator, Processor};
pub use crate::infrastructure::runtime::pipeline::Pipeline;
pub use crate::infrastructure::runtime::transform::TransformStage;
