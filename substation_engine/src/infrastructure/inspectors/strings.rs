// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! String-comparison inspectors: prefix, suffix, substring, and exact
//! equality, selected by a `function` setting.

use serde::Deserialize;

use substation_core::config::validate_data_pattern;
use substation_core::inspector::apply_negate;
use substation_core::{Capsule, Config, Inspector, InspectorBase, SubstationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFunction {
    StartsWith,
    EndsWith,
    Contains,
    Equals,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StringsSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    pub function: StringFunction,
    pub value: String,
    #[serde(default)]
    pub negate: bool,
}

pub struct StringsInspector {
    settings: StringsSettings,
}

impl StringsInspector {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: StringsSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        Ok(Self { settings })
    }
}

impl Inspector for StringsInspector {
    fn inspect(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());

        let result = match self.settings.function {
            StringFunction::StartsWith => subject.starts_with(&self.settings.value),
            StringFunction::EndsWith => subject.ends_with(&self.settings.value),
            StringFunction::Contains => subject.contains(&self.settings.value),
            StringFunction::Equals => subject == self.settings.value,
        };

        Ok(apply_negate(result, self.settings.negate))
    }
}

impl InspectorBase for StringsInspector {
    fn name(&self) -> &'static str {
        "strings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inspector(function: &str, value: &str) -> StringsInspector {
        let cfg = Config::new("strings", json!({"function": function, "value": value}));
        StringsInspector::new(&cfg).unwrap()
    }

    #[test]
    fn starts_with() {
        let i = inspector("starts_with", "foo");
        assert!(i.inspect(&Capsule::new(b"foobar".to_vec())).unwrap());
        assert!(!i.inspect(&Capsule::new(b"barfoo".to_vec())).unwrap());
    }

    #[test]
    fn ends_with() {
        let i = inspector("ends_with", "bar");
        assert!(i.inspect(&Capsule::new(b"foobar".to_vec())).unwrap());
    }

    #[test]
    fn contains() {
        let i = inspector("contains", "oob");
        assert!(i.inspect(&Capsule::new(b"foobar".to_vec())).unwrap());
    }

    #[test]
    fn equals() {
        let i = inspector("equals", "foobar");
        assert!(i.inspect(&Capsule::new(b"foobar".to_vec())).unwrap());
        assert!(!i.inspect(&Capsule::new(b"foobaz".to_vec())).unwrap());
    }
}
