// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Capsule
//!
//! The unit of data that flows through a pipeline. A capsule wraps raw bytes
//! plus an optional parsed JSON view, keeping the two in sync: once any
//! JSON-keyed read or write has happened, `data` is always the serialized
//! form of the JSON view.

use serde_json::Value;

use crate::error::SubstationError;
use crate::json_path;

/// A single record flowing through a pipeline.
///
/// Most inspectors/processors operate in one of two modes, chosen by whether
/// a `key`/`set_key` option is present:
///
/// - **Raw-data mode** (`key` and `set_key` both empty): the whole byte
///   payload is the subject.
/// - **JSON-keyed mode** (`key` and `set_key` both non-empty): a field
///   addressed by a dotted path within the capsule's parsed JSON is the
///   subject.
///
/// A capsule never allows `key` xor `set_key` to be set in isolation; see
/// [`crate::config::data_pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capsule {
    data: Vec<u8>,
    metadata: Vec<u8>,
}

impl Capsule {
    /// Builds a capsule from raw bytes, with no assumption that they are
    /// valid JSON. Starts with empty metadata.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into(), metadata: Vec::new() }
    }

    /// Builds a capsule from an already-parsed JSON value.
    pub fn from_json(value: &Value) -> Result<Self, SubstationError> {
        Ok(Self {
            data: serde_json::to_vec(value)?,
            metadata: Vec::new(),
        })
    }

    /// The raw byte payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replaces the whole byte payload (raw-data mode write).
    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
    }

    /// Auxiliary bytes carried alongside `data`, opaque to processors unless
    /// explicitly addressed (routing/trace attributes). Never touched by
    /// `get`/`set`/`get_value`/`set_value`, which only ever read or write
    /// `data`.
    pub fn metadata(&self) -> &[u8] {
        &self.metadata
    }

    /// Replaces the metadata bytes.
    pub fn set_metadata(&mut self, metadata: impl Into<Vec<u8>>) {
        self.metadata = metadata.into();
    }

    /// Parses the capsule's bytes as JSON. Fails if the bytes are not valid
    /// JSON; callers in JSON-keyed mode are expected to propagate this as a
    /// construction/processing error rather than silently skip the capsule.
    pub fn as_json(&self) -> Result<Value, SubstationError> {
        Ok(serde_json::from_slice(&self.data)?)
    }

    /// `true` if the capsule's bytes parse as JSON at all (used by the
    /// `json_valid` inspector).
    pub fn is_valid_json(&self) -> bool {
        serde_json::from_slice::<Value>(&self.data).is_ok()
    }

    /// Reads the value at a dotted path within the capsule's JSON. Returns
    /// `Value::Null` if the path is missing — this is a read, not a parse
    /// failure, so callers never see an error for an absent key.
    pub fn get(&self, key: &str) -> Result<Value, SubstationError> {
        let root = self.as_json()?;
        Ok(json_path::get(&root, key).clone())
    }

    /// Writes `value` at a dotted path within the capsule's JSON, creating
    /// intermediate objects/arrays as needed, then re-serializes `data` so
    /// the two stay in sync.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), SubstationError> {
        let mut root = self.as_json().unwrap_or(Value::Object(Default::default()));
        json_path::set(&mut root, key, value);
        self.data = serde_json::to_vec(&root)?;
        Ok(())
    }

    /// Deletes the value at a dotted path, if present. A no-op if the path
    /// does not resolve to anything.
    pub fn delete(&mut self, key: &str) -> Result<(), SubstationError> {
        let mut root = self.as_json()?;
        delete_path(&mut root, key);
        self.data = serde_json::to_vec(&root)?;
        Ok(())
    }

    /// Reads either the raw bytes (`key.is_empty()`) or a JSON field,
    /// depending on mode. This is the common entry point processors use so
    /// they don't have to branch on mode themselves.
    pub fn get_value(&self, key: &str) -> Result<Value, SubstationError> {
        if key.is_empty() {
            Ok(Value::String(String::from_utf8_lossy(&self.data).into_owned()))
        } else {
            self.get(key)
        }
    }

    /// Writes either the raw bytes (`set_key.is_empty()`) or a JSON field,
    /// depending on mode.
    pub fn set_value(&mut self, set_key: &str, value: Value) -> Result<(), SubstationError> {
        if set_key.is_empty() {
            let bytes = match value {
                Value::String(s) => s.into_bytes(),
                other => serde_json::to_vec(&other)?,
            };
            self.set_data(bytes);
            Ok(())
        } else {
            self.set(set_key, value)
        }
    }
}

fn delete_path(root: &mut Value, key: &str) {
    let Some((parent, leaf)) = key.rsplit_once('.') else {
        if let Value::Object(map) = root {
            map.remove(key);
        }
        return;
    };
    let parent_value = json_path::get(root, parent);
    if parent_value.is_object() {
        let mut cloned = parent_value.clone();
        if let Value::Object(map) = &mut cloned {
            map.remove(leaf);
        }
        json_path::set(root, parent, cloned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_data_roundtrip() {
        let mut c = Capsule::new(b"hello".to_vec());
        assert_eq!(c.data(), b"hello");
        c.set_data(b"world".to_vec());
        assert_eq!(c.data(), b"world");
    }

    #[test]
    fn json_get_set_roundtrip() {
        let mut c = Capsule::new(br#"{"foo":"bar"}"#.to_vec());
        assert_eq!(c.get("foo").unwrap(), json!("bar"));
        c.set("foo", json!("baz")).unwrap();
        assert_eq!(c.as_json().unwrap(), json!({"foo": "baz"}));
    }

    #[test]
    fn json_get_missing_key_is_null() {
        let c = Capsule::new(br#"{"foo":"bar"}"#.to_vec());
        assert_eq!(c.get("missing").unwrap(), Value::Null);
    }

    #[test]
    fn json_set_creates_nested_path() {
        let mut c = Capsule::new(b"{}".to_vec());
        c.set("a.b.c", json!(1)).unwrap();
        assert_eq!(c.as_json().unwrap(), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn is_valid_json_detects_malformed() {
        assert!(Capsule::new(b"{}".to_vec()).is_valid_json());
        assert!(!Capsule::new(b"not json".to_vec()).is_valid_json());
    }

    #[test]
    fn get_value_raw_mode_reads_whole_payload() {
        let c = Capsule::new(b"bar".to_vec());
        assert_eq!(c.get_value("").unwrap(), json!("bar"));
    }

    #[test]
    fn set_value_raw_mode_writes_whole_payload() {
        let mut c = Capsule::new(b"bar".to_vec());
        c.set_value("", json!("baz")).unwrap();
        assert_eq!(c.data(), b"baz");
    }

    #[test]
    fn delete_removes_leaf_field() {
        let mut c = Capsule::new(br#"{"foo":"bar","keep":1}"#.to_vec());
        c.delete("foo").unwrap();
        assert_eq!(c.as_json().unwrap(), json!({"keep": 1}));
    }

    #[test]
    fn metadata_is_independent_of_data() {
        let mut c = Capsule::new(b"hello".to_vec());
        assert_eq!(c.metadata(), b"");
        c.set_metadata(b"trace-id=1".to_vec());
        assert_eq!(c.metadata(), b"trace-id=1");
        assert_eq!(c.data(), b"hello");
    }

    #[test]
    fn delete_nested_field() {
        let mut c = Capsule::new(br#"{"a":{"b":1,"c":2}}"#.to_vec());
        c.delete("a.b").unwrap();
        assert_eq!(c.as_json().unwrap(), json!({"a": {"c": 2}}));
    }
}
