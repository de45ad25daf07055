// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Regular-expression match inspector.

use regex::Regex;
use serde::Deserialize;

use substation_core::{config::validate_data_pattern, Capsule, Config, Inspector, InspectorBase, SubstationError};
use substation_core::inspector::apply_negate;

#[derive(Debug, Clone, Deserialize)]
pub struct PatternSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    pub expression: String,
    #[serde(default)]
    pub negate: bool,
}

/// Tests whether a capsule's subject (raw data or a JSON field) matches a
/// regular expression. A malformed expression fails at construction time,
/// never at inspection time.
pub struct PatternInspector {
    settings: PatternSettings,
    regex: Regex,
}

impl PatternInspector {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: PatternSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        let regex = Regex::new(&settings.expression)?;
        Ok(Self { settings, regex })
    }
}

impl Inspector for PatternInspector {
    fn inspect(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
        Ok(apply_negate(self.regex.is_match(&subject), self.settings.negate))
    }
}

impl InspectorBase for PatternInspector {
    fn name(&self) -> &'static str {
        "pattern"
    }
}
