// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Length inspector: string byte length or JSON array/object element count,
//! compared against `min`/`max`/`equals` bounds.

use serde::Deserialize;
use serde_json::Value;

use substation_core::config::validate_data_pattern;
use substation_core::inspector::apply_negate;
use substation_core::{Capsule, Config, Inspector, InspectorBase, SubstationError};

#[derive(Debug, Clone, Deserialize)]
pub struct LengthSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub equals: Option<usize>,
    #[serde(default)]
    pub negate: bool,
}

pub struct LengthInspector {
    settings: LengthSettings,
}

impl LengthInspector {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: LengthSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        if settings.min.is_none() && settings.max.is_none() && settings.equals.is_none() {
            return Err(SubstationError::MissingRequiredOptions(
                "length requires at least one of min, max, equals".to_string(),
            ));
        }
        Ok(Self { settings })
    }
}

fn measure(value: &Value) -> usize {
    match value {
        Value::String(s) => s.len(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::Null => 0,
        other => other.to_string().len(),
    }
}

impl Inspector for LengthInspector {
    fn inspect(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let length = measure(&value);

        let mut result = true;
        if let Some(min) = self.settings.min {
            result &= length >= min;
        }
        if let Some(max) = self.settings.max {
            result &= length <= max;
        }
        if let Some(equals) = self.settings.equals {
            result &= length == equals;
        }

        Ok(apply_negate(result, self.settings.negate))
    }
}

impl InspectorBase for LengthInspector {
    fn name(&self) -> &'static str {
        "length"
    }
}
