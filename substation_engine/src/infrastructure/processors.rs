// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Processors
//!
//! Concrete [`substation_core::Applier`] and [`substation_core::Batcher`]
//! implementations, grouped by the kind of transformation they perform
//! rather than one file per type — most of these are a dozen lines of logic
//! around a shared settings-parsing skeleton.

pub mod batch;
pub mod compute;
pub mod network;
pub mod pipeline;
pub mod structure;
pub mod text;
