// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Document Loading
//!
//! A pipeline is authored as a JSON or YAML document: a name and an ordered
//! list of stages, each naming a processor and an optional gating
//! condition. Loading tries JSON first (the format the specification's
//! examples use), falling back to YAML so either authoring style works
//! without requiring the caller to know which one a given file uses.

use std::path::Path;

use serde::{Deserialize, Serialize};

use substation_core::{Config, SubstationError};

/// A gating condition: an operator reduction over a set of inspector
/// configs. When present on a stage, the stage's processor only runs
/// against capsules for which the condition evaluates `true`; capsules that
/// fail the condition pass through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionConfig {
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub inspectors: Vec<Config>,
}

fn default_operator() -> String {
    "all".to_string()
}

/// One stage of a pipeline: the processor to run, an optional gating
/// condition, and whether per-capsule processor errors should be ignored
/// (the capsule passes through unchanged) rather than aborting the stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub processor: Config,
    #[serde(default)]
    pub condition: Option<ConditionConfig>,
    #[serde(default)]
    pub ignore_errors: bool,
}

/// A complete declarative pipeline: a name (used in metric labels) and an
/// ordered list of stages applied in sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDocument {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

/// Loads a pipeline document from `path`. JSON is tried first regardless of
/// extension; if that fails, the bytes are re-parsed as YAML. A file that
/// parses as neither reports the JSON error, since JSON is the primary
/// authoring format.
pub fn load_pipeline_document(path: &Path) -> Result<PipelineDocument, SubstationError> {
    let bytes = std::fs::read(path)?;
    parse_pipeline_document(&bytes)
}

/// Parses a pipeline document from raw bytes, trying JSON then YAML.
pub fn parse_pipeline_document(bytes: &[u8]) -> Result<PipelineDocument, SubstationError> {
    match serde_json::from_slice::<PipelineDocument>(bytes) {
        Ok(doc) => Ok(doc),
        Err(json_err) => serde_yaml::from_slice::<PipelineDocument>(bytes)
            .map_err(|_| SubstationError::Serialization(format!("invalid pipeline document: {json_err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_json_document() {
        let doc = json!({
            "name": "demo",
            "stages": [
                {"processor": {"type": "base64", "settings": {"direction": "to"}}}
            ]
        });
        let parsed = parse_pipeline_document(doc.to_string().as_bytes()).unwrap();
        assert_eq!(parsed.name, "demo");
        assert_eq!(parsed.stages.len(), 1);
        assert_eq!(parsed.stages[0].processor.kind, "base64");
        assert!(!parsed.stages[0].ignore_errors);
    }

    #[test]
    fn parses_stage_with_condition() {
        let doc = json!({
            "name": "demo",
            "stages": [{
                "processor": {"type": "replace", "settings": {}},
                "condition": {
                    "operator": "any",
                    "inspectors": [{"type": "length", "settings": {}}]
                },
                "ignore_errors": true
            }]
        });
        let parsed = parse_pipeline_document(doc.to_string().as_bytes()).unwrap();
        let condition = parsed.stages[0].condition.as_ref().unwrap();
        assert_eq!(condition.operator, "any");
        assert!(parsed.stages[0].ignore_errors);
    }

    #[test]
    fn parses_yaml_document() {
        let yaml = "name: demo\nstages:\n  - processor:\n      type: base64\n      settings: {}\n";
        let parsed = parse_pipeline_document(yaml.as_bytes()).unwrap();
        assert_eq!(parsed.name, "demo");
    }

    #[test]
    fn invalid_document_errors() {
        assert!(parse_pipeline_document(b"not a pipeline").is_err());
    }
}
