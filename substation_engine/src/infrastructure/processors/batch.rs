// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Batchers that reshape a whole slice of capsules at once, changing the
//! record count: `aggregate` (merge N into 1 by policy), `drop` (filters out
//! capsules matching a condition), `count` (caps the batch at N records).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use substation_core::{Batcher, Capsule, Config, Operator, ProcessorBase, SubstationError};

use crate::infrastructure::config::ConditionConfig;

// --- aggregate --------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateSettings {
    /// JSON field to group by. When set, capsules sharing the same value at
    /// this field are merged into a single JSON object (a shallow merge,
    /// later capsules' fields winning on conflict). When empty, every
    /// capsule in a group is flat-merged into one object instead.
    #[serde(default)]
    pub key: String,
    /// Maximum capsules per group before the join-key/flat-merge policy
    /// above is applied. `0` means "no limit" (a single group for the whole
    /// batch).
    #[serde(default)]
    pub count: usize,
}

/// Merges groups of capsules into one capsule per group, either by a join
/// key (grouping capsules that share a field's value) or, with no key
/// configured, by flat-merging every capsule's JSON object together.
pub struct AggregateProcessor {
    settings: AggregateSettings,
}

impl AggregateProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        Ok(Self {
            settings: config.parse_settings()?,
        })
    }
}

fn flat_merge(chunk: &[Capsule]) -> Result<Value, SubstationError> {
    let mut merged = Map::new();
    for capsule in chunk {
        if let Value::Object(fields) = capsule.as_json()? {
            merged.extend(fields);
        }
    }
    Ok(Value::Object(merged))
}

fn join_key_merge(chunk: &[Capsule], key: &str) -> Result<Vec<Capsule>, SubstationError> {
    let mut groups: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    let mut order: Vec<String> = Vec::new();

    for capsule in chunk {
        let join_value = capsule.get(key)?;
        let join_key = match &join_value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let fields = match capsule.as_json()? {
            Value::Object(fields) => fields,
            other => {
                let mut single = Map::new();
                single.insert(key.to_string(), other);
                single
            }
        };
        match groups.get_mut(&join_key) {
            Some(existing) => existing.extend(fields),
            None => {
                order.push(join_key.clone());
                groups.insert(join_key, fields);
            }
        }
    }

    order
        .into_iter()
        .map(|join_key| {
            let fields = groups.remove(&join_key).unwrap_or_default();
            Capsule::from_json(&Value::Object(fields))
        })
        .collect()
}

impl Batcher for AggregateProcessor {
    fn apply_batch(&self, capsules: Vec<Capsule>) -> Result<Vec<Capsule>, SubstationError> {
        let group_size = if self.settings.count == 0 { capsules.len().max(1) } else { self.settings.count };

        let mut out = Vec::new();
        for chunk in capsules.chunks(group_size) {
            if self.settings.key.is_empty() {
                out.push(Capsule::from_json(&flat_merge(chunk)?)?);
            } else {
                out.extend(join_key_merge(chunk, &self.settings.key)?);
            }
        }
        Ok(out)
    }
}

impl ProcessorBase for AggregateProcessor {
    fn name(&self) -> &'static str {
        "aggregate"
    }
}

// --- drop ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DropSettings {
    #[serde(flatten)]
    pub condition: ConditionConfig,
}

/// Filters out capsules that match a condition, passing the rest through
/// unchanged. Non-matching capsules short-circuit straight through without
/// any further work, since dropping has nothing else to do to a survivor.
pub struct DropProcessor {
    operator: Operator,
}

impl DropProcessor {
    pub fn new(config: &Config, operator: Operator) -> Result<Self, SubstationError> {
        let _settings: DropSettings = config.parse_settings()?;
        Ok(Self { operator })
    }

    /// The condition the registry must build into an [`Operator`] before
    /// calling [`Self::new`], mirroring the recursive-construction pattern
    /// used for `for_each` and `pipeline`.
    pub fn condition_config(config: &Config) -> Result<ConditionConfig, SubstationError> {
        let settings: DropSettings = config.parse_settings()?;
        Ok(settings.condition)
    }
}

impl Batcher for DropProcessor {
    fn apply_batch(&self, capsules: Vec<Capsule>) -> Result<Vec<Capsule>, SubstationError> {
        let mut out = Vec::with_capacity(capsules.len());
        for capsule in capsules {
            if !self.operator.operate(&capsule)? {
                out.push(capsule);
            }
        }
        Ok(out)
    }
}

impl ProcessorBase for DropProcessor {
    fn name(&self) -> &'static str {
        "drop"
    }
}

// --- count ----------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CountSettings {
    pub limit: usize,
}

/// Caps a batch at `limit` records, dropping the rest and preserving order.
pub struct CountProcessor {
    settings: CountSettings,
}

impl CountProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        Ok(Self {
            settings: config.parse_settings()?,
        })
    }
}

impl Batcher for CountProcessor {
    fn apply_batch(&self, capsules: Vec<Capsule>) -> Result<Vec<Capsule>, SubstationError> {
        Ok(capsules.into_iter().take(self.settings.limit).collect())
    }
}

impl ProcessorBase for CountProcessor {
    fn name(&self) -> &'static str {
        "count"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aggregate_flat_merges_whole_batch_with_no_key() {
        let processor = AggregateProcessor::new(&Config::new("aggregate", json!({}))).unwrap();
        let capsules = vec![
            Capsule::new(br#"{"a":1}"#.to_vec()),
            Capsule::new(br#"{"b":2}"#.to_vec()),
        ];
        let out = processor.apply_batch(capsules).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_json().unwrap(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn aggregate_groups_by_join_key() {
        let processor = AggregateProcessor::new(&Config::new("aggregate", json!({"key": "id"}))).unwrap();
        let capsules = vec![
            Capsule::new(br#"{"id":"x","a":1}"#.to_vec()),
            Capsule::new(br#"{"id":"x","b":2}"#.to_vec()),
            Capsule::new(br#"{"id":"y","c":3}"#.to_vec()),
        ];
        let out = processor.apply_batch(capsules).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_json().unwrap(), json!({"id": "x", "a": 1, "b": 2}));
        assert_eq!(out[1].as_json().unwrap(), json!({"id": "y", "c": 3}));
    }

    #[test]
    fn aggregate_respects_group_count_limit() {
        let processor = AggregateProcessor::new(&Config::new("aggregate", json!({"count": 2}))).unwrap();
        let capsules = vec![
            Capsule::new(br#"{"a":1}"#.to_vec()),
            Capsule::new(br#"{"b":2}"#.to_vec()),
            Capsule::new(br#"{"c":3}"#.to_vec()),
        ];
        let out = processor.apply_batch(capsules).unwrap();
        assert_eq!(out.len(), 2);
    }

    fn build_drop(condition: Value) -> DropProcessor {
        let cfg = Config::new("drop", condition);
        let condition_config = DropProcessor::condition_config(&cfg).unwrap();
        let operator = crate::infrastructure::registry::build_operator(&condition_config).unwrap();
        DropProcessor::new(&cfg, operator).unwrap()
    }

    #[test]
    fn drop_removes_capsules_matching_the_condition() {
        let processor = build_drop(json!({
            "operator": "all",
            "inspectors": [{"type": "strings", "settings": {"function": "equals", "value": "skip"}}]
        }));
        let capsules = vec![Capsule::new(b"skip".to_vec()), Capsule::new(b"keep".to_vec())];
        let out = processor.apply_batch(capsules).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].data(), b"keep");
    }

    #[test]
    fn drop_keeps_everything_when_condition_never_matches() {
        let processor = build_drop(json!({
            "operator": "all",
            "inspectors": [{"type": "strings", "settings": {"function": "equals", "value": "nothing-matches-this"}}]
        }));
        let capsules = vec![Capsule::new(b"a".to_vec()), Capsule::new(b"b".to_vec())];
        let out = processor.apply_batch(capsules).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn count_caps_batch_preserving_order() {
        let processor = CountProcessor::new(&Config::new("count", json!({"limit": 2}))).unwrap();
        let capsules = vec![
            Capsule::new(b"a".to_vec()),
            Capsule::new(b"b".to_vec()),
            Capsule::new(b"c".to_vec()),
        ];
        let out = processor.apply_batch(capsules).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].data(), b"a");
        assert_eq!(out[1].data(), b"b");
    }

    #[test]
    fn count_passes_through_when_batch_is_within_limit() {
        let processor = CountProcessor::new(&Config::new("count", json!({"limit": 5}))).unwrap();
        let capsules = vec![Capsule::new(b"a".to_vec())];
        let out = processor.apply_batch(capsules).unwrap();
        assert_eq!(out.len(), 1);
    }
}
