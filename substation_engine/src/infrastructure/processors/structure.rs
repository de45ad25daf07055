// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Structural appliers that move or reshape fields within a capsule's JSON:
//! `copy`, `delete`, `insert`, `convert`, `expand`, `flatten`, `for_each`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use substation_core::config::validate_data_pattern;
use substation_core::{Applier, Capsule, Config, ProcessorBase, SubstationError};

// --- copy -------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CopySettings {
    pub key: String,
    pub set_key: String,
}

/// Copies a field from one JSON path to another, leaving the source intact.
pub struct CopyProcessor {
    settings: CopySettings,
}

impl CopyProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: CopySettings = config.parse_settings()?;
        if settings.key.is_empty() || settings.set_key.is_empty() {
            return Err(SubstationError::InvalidDataPattern {
                key: settings.key,
                set_key: settings.set_key,
            });
        }
        Ok(Self { settings })
    }
}

impl Applier for CopyProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get(&self.settings.key)?;
        let mut out = capsule.clone();
        out.set(&self.settings.set_key, value)?;
        Ok(out)
    }
}

impl ProcessorBase for CopyProcessor {
    fn name(&self) -> &'static str {
        "copy"
    }
}

// --- delete -------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteSettings {
    #[serde(default)]
    pub key: String,
}

/// Removes a field from the capsule's JSON. A no-op if the field is absent.
pub struct DeleteProcessor {
    settings: DeleteSettings,
}

impl DeleteProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: DeleteSettings = config.parse_settings()?;
        if settings.key.is_empty() {
            return Err(SubstationError::MissingRequiredOptions("delete requires key".to_string()));
        }
        Ok(Self { settings })
    }
}

impl Applier for DeleteProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let mut out = capsule.clone();
        out.delete(&self.settings.key)?;
        Ok(out)
    }
}

impl ProcessorBase for DeleteProcessor {
    fn name(&self) -> &'static str {
        "delete"
    }
}

// --- insert -------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct InsertSettings {
    #[serde(default)]
    pub set_key: String,
    pub value: Value,
}

/// Writes a literal value at a JSON path, overwriting whatever was there.
pub struct InsertProcessor {
    settings: InsertSettings,
}

impl InsertProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: InsertSettings = config.parse_settings()?;
        if settings.set_key.is_empty() {
            return Err(SubstationError::MissingRequiredOptions("insert requires set_key".to_string()));
        }
        Ok(Self { settings })
    }
}

impl Applier for InsertProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let mut out = capsule.clone();
        out.set(&self.settings.set_key, self.settings.value.clone())?;
        Ok(out)
    }
}

impl ProcessorBase for InsertProcessor {
    fn name(&self) -> &'static str {
        "insert"
    }
}

// --- convert ------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvertType {
    String,
    Integer,
    Float,
    Boolean,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertSettings {
    pub key: String,
    pub set_key: String,
    #[serde(rename = "type")]
    pub to: ConvertType,
}

/// Converts a JSON field's type in place (e.g. the string `"42"` to the
/// number `42`).
pub struct ConvertProcessor {
    settings: ConvertSettings,
}

impl ConvertProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: ConvertSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        Ok(Self { settings })
    }
}

fn convert(value: &Value, to: ConvertType) -> Result<Value, SubstationError> {
    let as_string = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    Ok(match to {
        ConvertType::String => Value::String(as_string),
        ConvertType::Integer => {
            let n: i64 = as_string
                .trim()
                .parse()
                .map_err(|e| SubstationError::for_processor("convert", e))?;
            Value::from(n)
        }
        ConvertType::Float => {
            let n: f64 = as_string
                .trim()
                .parse()
                .map_err(|e| SubstationError::for_processor("convert", e))?;
            serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
        }
        ConvertType::Boolean => match value {
            Value::Bool(b) => Value::Bool(*b),
            _ => Value::Bool(matches!(as_string.trim(), "true" | "1")),
        },
    })
}

impl Applier for ConvertProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let converted = convert(&value, self.settings.to)?;
        let mut out = capsule.clone();
        out.set_value(&self.settings.set_key, converted)?;
        Ok(out)
    }
}

impl ProcessorBase for ConvertProcessor {
    fn name(&self) -> &'static str {
        "convert"
    }
}

// --- expand ---------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ExpandSettings {
    pub key: String,
    pub set_key: String,
}

/// Flattens one level of a nested array into the enclosing array: each
/// element that is itself an array is spliced into the parent in place of
/// itself, everything else passes through unchanged. `{"items": [[1,2],[3],4]}`
/// becomes `{"items": [1,2,3,4]}`.
pub struct ExpandProcessor {
    settings: ExpandSettings,
}

impl ExpandProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: ExpandSettings = config.parse_settings()?;
        if settings.key.is_empty() || settings.set_key.is_empty() {
            return Err(SubstationError::InvalidDataPattern {
                key: settings.key,
                set_key: settings.set_key,
            });
        }
        Ok(Self { settings })
    }
}

impl Applier for ExpandProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get(&self.settings.key)?;
        let items = value.as_array().cloned().unwrap_or_default();

        let mut expanded = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Array(inner) => expanded.extend(inner),
                other => expanded.push(other),
            }
        }

        let mut out = capsule.clone();
        out.set(&self.settings.set_key, Value::Array(expanded))?;
        Ok(out)
    }
}

impl ProcessorBase for ExpandProcessor {
    fn name(&self) -> &'static str {
        "expand"
    }
}

// --- flatten ----------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct FlattenSettings {
    pub key: String,
    pub set_key: String,
    #[serde(default)]
    pub deep: bool,
}

/// Flattens nested arrays under a JSON field into a single flat array.
/// `deep: false` (default) removes one level of nesting, same as `expand`
/// but as an assignment rather than a splice. `deep: true` recurses through
/// arbitrarily nested arrays until no element is itself an array.
pub struct FlattenProcessor {
    settings: FlattenSettings,
}

impl FlattenProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: FlattenSettings = config.parse_settings()?;
        if settings.key.is_empty() || settings.set_key.is_empty() {
            return Err(SubstationError::InvalidDataPattern {
                key: settings.key,
                set_key: settings.set_key,
            });
        }
        Ok(Self { settings })
    }
}

fn flatten_one_level(items: Vec<Value>) -> Vec<Value> {
    let mut flattened = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => flattened.extend(inner),
            other => flattened.push(other),
        }
    }
    flattened
}

fn flatten_deep(items: Vec<Value>, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) => flatten_deep(inner, out),
            other => out.push(other),
        }
    }
}

impl Applier for FlattenProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get(&self.settings.key)?;
        let items = value.as_array().cloned().unwrap_or_default();

        let flattened = if self.settings.deep {
            let mut out = Vec::with_capacity(items.len());
            flatten_deep(items, &mut out);
            out
        } else {
            flatten_one_level(items)
        };

        let mut out = capsule.clone();
        out.set(&self.settings.set_key, Value::Array(flattened))?;
        Ok(out)
    }
}

impl ProcessorBase for FlattenProcessor {
    fn name(&self) -> &'static str {
        "flatten"
    }
}

// --- for_each -----------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ForEachSettings {
    pub key: String,
    pub set_key: String,
    pub processor: Config,
}

/// Applies a single inner processor to every element of a JSON array field,
/// writing the transformed array back. Mirrors
/// [`crate::infrastructure::inspectors::for_each::ForEachInspector`]: the
/// inner processor is built by the registry and handed in already
/// constructed, since doing so requires a registry lookup this module
/// doesn't have access to.
pub struct ForEachProcessor {
    settings: ForEachSettings,
    inner: Arc<dyn Applier>,
}

impl ForEachProcessor {
    pub fn new(config: &Config, inner: Arc<dyn Applier>) -> Result<Self, SubstationError> {
        let settings: ForEachSettings = config.parse_settings()?;
        if settings.key.is_empty() || settings.set_key.is_empty() {
            return Err(SubstationError::InvalidDataPattern {
                key: settings.key,
                set_key: settings.set_key,
            });
        }
        Ok(Self { settings, inner })
    }

    /// The nested processor config the registry must build before calling
    /// [`Self::new`].
    pub fn inner_config(config: &Config) -> Result<Config, SubstationError> {
        let settings: ForEachSettings = config.parse_settings()?;
        Ok(settings.processor)
    }
}

/// Builds the temporary capsule an element is run through. A string element
/// becomes its raw bytes (so an inner processor running in raw/unkeyed mode,
/// like `base64` or `capture`, reads the bare subject rather than a
/// re-quoted JSON string); anything else is JSON-encoded so array/object
/// elements stay parseable for inner processors that expect one (`math`,
/// `join`, `pipeline`).
fn element_to_capsule(item: &Value) -> Result<Capsule, SubstationError> {
    match item {
        Value::String(s) => Ok(Capsule::new(s.as_bytes().to_vec())),
        other => Capsule::from_json(other),
    }
}

/// Reads an inner processor's result capsule back into a `Value` to write
/// into `set_key`. Tries JSON first so structured raw-mode output (numbers,
/// arrays, objects) round-trips; falls back to the lossy-UTF8 string for
/// plain-text raw output (e.g. a decoded `base64` subject) that isn't valid
/// JSON on its own.
fn capsule_to_element(capsule: &Capsule) -> Value {
    capsule
        .as_json()
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(capsule.data()).into_owned()))
}

impl Applier for ForEachProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get(&self.settings.key)?;
        let items = value.as_array().cloned().unwrap_or_default();

        let mut out = capsule.clone();
        for item in &items {
            let temp = element_to_capsule(item)?;
            let result = self.inner.apply(&temp)?;
            out.set_value(&self.settings.set_key, capsule_to_element(&result))?;
        }
        Ok(out)
    }
}

impl ProcessorBase for ForEachProcessor {
    fn name(&self) -> &'static str {
        "for_each"
    }
}
