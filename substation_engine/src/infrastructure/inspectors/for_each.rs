// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `for_each` inspector: applies a single inner inspector to every element
//! of a JSON array subject and reduces the per-element results with
//! `all`/`any`/`none` semantics, just like [`substation_core::operator`]
//! reduces a set of distinct inspectors.
//!
//! The inner inspector is built by the registry (it may itself be any
//! inspector, including another `for_each`) and handed to
//! [`ForEachInspector::new`] already constructed, since building it requires
//! a registry lookup this module doesn't have access to.

use std::sync::Arc;

use serde::Deserialize;

use substation_core::config::validate_data_pattern;
use substation_core::inspector::apply_negate;
use substation_core::{Capsule, Config, Inspector, InspectorBase, OperatorType, SubstationError};

#[derive(Debug, Clone, Deserialize)]
pub struct ForEachSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    #[serde(rename = "type")]
    pub reduction: String,
    #[serde(default)]
    pub negate: bool,
    pub inspector: Config,
}

pub struct ForEachInspector {
    settings: ForEachSettings,
    reduction: OperatorType,
    inner: Arc<dyn Inspector>,
}

impl ForEachInspector {
    pub fn new(config: &Config, inner: Arc<dyn Inspector>) -> Result<Self, SubstationError> {
        let settings: ForEachSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        let reduction = OperatorType::parse(&settings.reduction)?;
        Ok(Self { settings, reduction, inner })
    }

    /// The nested inspector config the registry must build before calling
    /// [`Self::new`].
    pub fn inner_config(config: &Config) -> Result<Config, SubstationError> {
        let settings: ForEachSettings = config.parse_settings()?;
        Ok(settings.inspector)
    }
}

impl Inspector for ForEachInspector {
    fn inspect(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let elements = value.as_array().cloned().unwrap_or_default();

        let mut matched = 0usize;
        for element in &elements {
            let temp = Capsule::from_json(element)?;
            if self.inner.inspect(&temp)? {
                matched += 1;
            }
        }

        let result = match self.reduction {
            OperatorType::All => matched == elements.len(),
            OperatorType::Any => matched > 0,
            OperatorType::None => matched == 0,
        };

        Ok(apply_negate(result, self.settings.negate))
    }
}

impl InspectorBase for ForEachInspector {
    fn name(&self) -> &'static str {
        "for_each"
    }
}
