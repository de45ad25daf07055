// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Processors
//!
//! Two processor flavors, both built from a [`crate::config::Config`] by the
//! engine crate's registry:
//!
//! - [`Applier`] transforms one capsule into one capsule (base64, hash,
//!   replace, dns, ...).
//! - [`Batcher`] reshapes a whole batch of capsules into a new batch
//!   (aggregate, drop, count, ...).
//!
//! Both are synchronous: any I/O a concrete implementation needs (DNS
//! lookups, in particular) is expected to block the calling worker task
//! rather than being woven into the trait signature, matching how the
//! transform stage schedules processor work on its own tasks.

use crate::capsule::Capsule;
use crate::error::SubstationError;

/// Transforms a single capsule into a single capsule.
pub trait Applier: Send + Sync {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError>;
}

/// Transforms a batch of capsules into a new batch. Unlike [`Applier`], a
/// batcher may change the number of capsules (drop filters some out,
/// aggregate collapses many into one).
pub trait Batcher: Send + Sync {
    fn apply_batch(&self, capsules: Vec<Capsule>) -> Result<Vec<Capsule>, SubstationError>;
}

/// Marker supertrait exposing a processor's registered name, for error
/// messages and metrics labels.
pub trait ProcessorBase {
    fn name(&self) -> &'static str;
}
