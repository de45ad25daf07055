// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Declarative Configuration
//!
//! Every inspector and processor is built from a `(type, settings)` pair:
//! a string tag naming the concrete implementation, and an arbitrary JSON
//! settings bag that implementation parses for itself. This mirrors how a
//! pipeline document is authored — a flat list of `{"type": "...", "settings":
//! {...}}` objects — without requiring a registry of generic types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubstationError;

/// A declarative `(type, settings)` pair naming one inspector or processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub settings: Value,
}

impl Config {
    pub fn new(kind: impl Into<String>, settings: Value) -> Self {
        Self {
            kind: kind.into(),
            settings,
        }
    }

    /// Deserializes `settings` into a concrete options struct, mapping a
    /// deserialization failure to [`SubstationError::InvalidOption`].
    pub fn parse_settings<T: for<'de> Deserialize<'de>>(&self) -> Result<T, SubstationError> {
        serde_json::from_value(self.settings.clone())
            .map_err(|e| SubstationError::InvalidOption(format!("{}: {e}", self.kind)))
    }
}

/// Validates the data-pattern invariant shared by every keyed inspector and
/// processor: `key` and `set_key` must both be empty (whole-data mode) or
/// both be non-empty (JSON-keyed mode). Returns
/// [`SubstationError::InvalidDataPattern`] if exactly one is set.
pub fn validate_data_pattern(key: &str, set_key: &str) -> Result<(), SubstationError> {
    if key.is_empty() != set_key.is_empty() {
        return Err(SubstationError::InvalidDataPattern {
            key: key.to_string(),
            set_key: set_key.to_string(),
        });
    }
    Ok(())
}
