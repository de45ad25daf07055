// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `json_valid` and `json_schema` inspectors.

use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;

use substation_core::inspector::apply_negate;
use substation_core::{Capsule, Config, Inspector, InspectorBase, SubstationError};

#[derive(Debug, Clone, Deserialize)]
pub struct JsonValidSettings {
    #[serde(default)]
    pub negate: bool,
}

/// Tests whether the capsule's whole payload parses as JSON.
pub struct JsonValidInspector {
    settings: JsonValidSettings,
}

impl JsonValidInspector {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        Ok(Self {
            settings: config.parse_settings()?,
        })
    }
}

impl Inspector for JsonValidInspector {
    fn inspect(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        Ok(apply_negate(capsule.is_valid_json(), self.settings.negate))
    }
}

impl InspectorBase for JsonValidInspector {
    fn name(&self) -> &'static str {
        "json_valid"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonSchemaSettings {
    pub schema: Value,
    #[serde(default)]
    pub negate: bool,
}

/// Validates the capsule's JSON against a compiled JSON Schema. A malformed
/// schema fails at construction time.
pub struct JsonSchemaInspector {
    negate: bool,
    validator: Validator,
}

impl JsonSchemaInspector {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: JsonSchemaSettings = config.parse_settings()?;
        let validator = jsonschema::validator_for(&settings.schema)
            .map_err(|e| SubstationError::InvalidOption(format!("json_schema: {e}")))?;
        Ok(Self {
            negate: settings.negate,
            validator,
        })
    }
}

impl Inspector for JsonSchemaInspector {
    fn inspect(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        let root = capsule.as_json()?;
        Ok(apply_negate(self.validator.is_valid(&root), self.negate))
    }
}

impl InspectorBase for JsonSchemaInspector {
    fn name(&self) -> &'static str {
        "json_schema"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_valid_detects_malformed_payload() {
        let inspector = JsonValidInspector::new(&Config::new("json_valid", json!({}))).unwrap();
        assert!(inspector.inspect(&Capsule::new(b"{}".to_vec())).unwrap());
        assert!(!inspector.inspect(&Capsule::new(b"nope".to_vec())).unwrap());
    }

    #[test]
    fn json_schema_validates_against_compiled_schema() {
        let cfg = Config::new(
            "json_schema",
            json!({"schema": {"type": "object", "required": ["id"]}}),
        );
        let inspector = JsonSchemaInspector::new(&cfg).unwrap();
        assert!(inspector.inspect(&Capsule::new(br#"{"id":1}"#.to_vec())).unwrap());
        assert!(!inspector.inspect(&Capsule::new(br#"{}"#.to_vec())).unwrap());
    }

    #[test]
    fn json_schema_invalid_schema_fails_at_construction() {
        let cfg = Config::new("json_schema", json!({"schema": {"type": "not-a-type"}}));
        assert!(JsonSchemaInspector::new(&cfg).is_err());
    }
}
