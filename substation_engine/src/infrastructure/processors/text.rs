// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Text-transform appliers: `base64`, `case`, `replace`, `join`, `capture`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use substation_core::config::validate_data_pattern;
use substation_core::{Applier, Capsule, Config, ProcessorBase, SubstationError};

// --- base64 -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Base64Direction {
    Encode,
    Decode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Base64Settings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    pub direction: Base64Direction,
}

pub struct Base64Processor {
    settings: Base64Settings,
}

impl Base64Processor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: Base64Settings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        Ok(Self { settings })
    }
}

impl Applier for Base64Processor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().unwrap_or_default();

        let transformed = match self.settings.direction {
            Base64Direction::Encode => BASE64.encode(subject.as_bytes()),
            Base64Direction::Decode => {
                let decoded = BASE64
                    .decode(subject)
                    .map_err(|e| SubstationError::for_processor("base64", e))?;
                String::from_utf8(decoded).map_err(|e| SubstationError::for_processor("base64", e))?
            }
        };

        let mut out = capsule.clone();
        out.set_value(&self.settings.set_key, Value::String(transformed))?;
        Ok(out)
    }
}

impl ProcessorBase for Base64Processor {
    fn name(&self) -> &'static str {
        "base64"
    }
}

// --- case ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    Upper,
    Lower,
    Snake,
    ShoutySnake,
    Camel,
    Kebab,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    #[serde(rename = "case")]
    pub kind: CaseKind,
}

pub struct CaseProcessor {
    settings: CaseSettings,
}

impl CaseProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: CaseSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        Ok(Self { settings })
    }
}

impl Applier for CaseProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().unwrap_or_default();

        let transformed = match self.settings.kind {
            CaseKind::Upper => subject.to_uppercase(),
            CaseKind::Lower => subject.to_lowercase(),
            CaseKind::Snake => subject.to_snake_case(),
            CaseKind::ShoutySnake => subject.to_shouty_snake_case(),
            CaseKind::Camel => subject.to_lower_camel_case(),
            CaseKind::Kebab => subject.to_kebab_case(),
        };

        let mut out = capsule.clone();
        out.set_value(&self.settings.set_key, Value::String(transformed))?;
        Ok(out)
    }
}

impl ProcessorBase for CaseProcessor {
    fn name(&self) -> &'static str {
        "case"
    }
}

// --- replace --------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    #[serde(default)]
    pub old: String,
    #[serde(default)]
    pub new: String,
}

pub struct ReplaceProcessor {
    settings: ReplaceSettings,
}

impl ReplaceProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: ReplaceSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        if settings.old.is_empty() {
            return Err(SubstationError::MissingRequiredOptions("replace requires old".to_string()));
        }
        Ok(Self { settings })
    }
}

impl Applier for ReplaceProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().unwrap_or_default();
        let transformed = subject.replace(&self.settings.old, &self.settings.new);

        let mut out = capsule.clone();
        out.set_value(&self.settings.set_key, Value::String(transformed))?;
        Ok(out)
    }
}

impl ProcessorBase for ReplaceProcessor {
    fn name(&self) -> &'static str {
        "replace"
    }
}

// --- join -------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct JoinSettings {
    pub key: String,
    pub set_key: String,
    #[serde(default)]
    pub separator: String,
}

/// Joins a JSON array field into a single delimited string. Always
/// JSON-keyed: there is no raw-data array to join.
pub struct JoinProcessor {
    settings: JoinSettings,
}

impl JoinProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: JoinSettings = config.parse_settings()?;
        if settings.key.is_empty() || settings.set_key.is_empty() {
            return Err(SubstationError::InvalidDataPattern {
                key: settings.key,
                set_key: settings.set_key,
            });
        }
        Ok(Self { settings })
    }
}

impl Applier for JoinProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get(&self.settings.key)?;
        let items = value.as_array().cloned().unwrap_or_default();
        let joined = items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(&self.settings.separator);

        let mut out = capsule.clone();
        out.set(&self.settings.set_key, Value::String(joined))?;
        Ok(out)
    }
}

impl ProcessorBase for JoinProcessor {
    fn name(&self) -> &'static str {
        "join"
    }
}

// --- capture ------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    pub expression: String,
}

/// Extracts the first capture group of a regular expression; the whole
/// match if the expression has no groups.
pub struct CaptureProcessor {
    settings: CaptureSettings,
    regex: Regex,
}

impl CaptureProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: CaptureSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        let regex = Regex::new(&settings.expression)?;
        Ok(Self { settings, regex })
    }
}

impl Applier for CaptureProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().unwrap_or_default();

        let captured = self
            .regex
            .captures(subject)
            .and_then(|c| c.get(1).or_else(|| c.get(0)))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let mut out = capsule.clone();
        out.set_value(&self.settings.set_key, Value::String(captured))?;
        Ok(out)
    }
}

impl ProcessorBase for CaptureProcessor {
    fn name(&self) -> &'static str {
        "capture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base64_round_trips() {
        let encode = Base64Processor::new(&Config::new("base64", json!({"direction": "encode"}))).unwrap();
        let encoded = encode.apply(&Capsule::new(b"hello".to_vec())).unwrap();
        assert_eq!(encoded.data(), b"aGVsbG8=");

        let decode = Base64Processor::new(&Config::new("base64", json!({"direction": "decode"}))).unwrap();
        let decoded = decode.apply(&encoded).unwrap();
        assert_eq!(decoded.data(), b"hello");
    }

    #[test]
    fn case_snake_converts() {
        let processor = CaseProcessor::new(&Config::new("case", json!({"case": "snake"}))).unwrap();
        let out = processor.apply(&Capsule::new(b"HelloWorld".to_vec())).unwrap();
        assert_eq!(out.data(), b"hello_world");
    }

    #[test]
    fn replace_substitutes_substring() {
        let processor = ReplaceProcessor::new(&Config::new("replace", json!({"old": "r", "new": "z"}))).unwrap();
        let out = processor.apply(&Capsule::new(b"bar".to_vec())).unwrap();
        assert_eq!(out.data(), b"baz");
    }

    #[test]
    fn replace_with_empty_new_deletes_substring() {
        let processor = ReplaceProcessor::new(&Config::new("replace", json!({"old": "r", "new": ""}))).unwrap();
        let out = processor.apply(&Capsule::new(b"bar".to_vec())).unwrap();
        assert_eq!(out.data(), b"ba");
    }

    #[test]
    fn replace_missing_old_is_construction_error() {
        let result = ReplaceProcessor::new(&Config::new("replace", json!({"new": "z"})));
        assert!(matches!(result, Err(SubstationError::MissingRequiredOptions(_))));
    }

    #[test]
    fn replace_on_json_field() {
        let processor =
            ReplaceProcessor::new(&Config::new("replace", json!({"key": "foo", "set_key": "foo", "old": "r", "new": "z"}))).unwrap();
        let out = processor.apply(&Capsule::new(br#"{"foo":"bar"}"#.to_vec())).unwrap();
        assert_eq!(out.as_json().unwrap(), json!({"foo": "baz"}));
    }

    #[test]
    fn join_concatenates_array_with_separator() {
        let processor =
            JoinProcessor::new(&Config::new("join", json!({"key": "items", "set_key": "joined", "separator": ","}))).unwrap();
        let out = processor.apply(&Capsule::new(br#"{"items":["a","b","c"]}"#.to_vec())).unwrap();
        assert_eq!(out.get("joined").unwrap(), json!("a,b,c"));
    }

    #[test]
    fn capture_extracts_first_group() {
        let processor =
            CaptureProcessor::new(&Config::new("capture", json!({"expression": r"id=(\d+)"}))).unwrap();
        let out = processor.apply(&Capsule::new(b"id=42".to_vec())).unwrap();
        assert_eq!(out.data(), b"42");
    }
}
