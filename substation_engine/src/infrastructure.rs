// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Concrete implementations built against `substation_core`'s traits:
//! inspectors and processors, the declarative registry that constructs them
//! from a pipeline document, the transform-stage runtime, and the ambient
//! Prometheus/`tracing` wiring.

pub mod config;
pub mod inspectors;
pub mod logging;
pub mod metrics;
pub mod processors;
pub mod registry;
pub mod runtime;
