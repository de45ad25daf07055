// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end tests driving a multi-stage pipeline through its public API,
//! the way a loaded pipeline document would run in production.

use serde_json::json;

use substation_engine::infrastructure::config::{ConditionConfig, PipelineDocument, StageConfig};
use substation_engine::{Capsule, Config, Pipeline};

#[test]
fn uppercases_and_hashes_text_fields() {
    let document = PipelineDocument {
        name: "uppercase-and-hash".to_string(),
        stages: vec![
            StageConfig {
                processor: Config::new("convert", json!({"key": "name", "set_key": "name", "type": "string"})),
                condition: None,
                ignore_errors: false,
            },
            StageConfig {
                processor: Config::new("case", json!({"key": "name", "set_key": "name", "case": "upper"})),
                condition: None,
                ignore_errors: false,
            },
            StageConfig {
                processor: Config::new("hash", json!({"key": "name", "set_key": "name_hash", "algorithm": "sha256"})),
                condition: None,
                ignore_errors: false,
            },
        ],
    };

    let pipeline = Pipeline::from_document(&document).unwrap();
    let input = Capsule::new(br#"{"name":"substation"}"#.to_vec());
    let out = pipeline.run(vec![input]).unwrap();

    assert_eq!(out.len(), 1);
    let result = out[0].as_json().unwrap();
    assert_eq!(result["name"], json!("SUBSTATION"));
    assert!(result["name_hash"].as_str().unwrap().len() == 64);
}

#[test]
fn condition_skips_non_matching_capsules_across_a_batch() {
    let document = PipelineDocument {
        name: "conditional-redact".to_string(),
        stages: vec![StageConfig {
            processor: Config::new("insert", json!({"set_key": "redacted", "value": true})),
            condition: Some(ConditionConfig {
                operator: "all".to_string(),
                negate: false,
                inspectors: vec![Config::new(
                    "strings",
                    json!({"key": "kind", "function": "equals", "value": "secret"}),
                )],
            }),
            ignore_errors: false,
        }],
    };

    let pipeline = Pipeline::from_document(&document).unwrap();
    let batch = vec![
        Capsule::new(br#"{"kind":"secret"}"#.to_vec()),
        Capsule::new(br#"{"kind":"public"}"#.to_vec()),
    ];
    let out = pipeline.run(batch).unwrap();

    assert_eq!(out[0].get("redacted").unwrap(), json!(true));
    assert_eq!(out[1].get("redacted").unwrap(), serde_json::Value::Null);
}

#[test]
fn batcher_stage_caps_and_applier_stage_still_runs_after_it() {
    let document = PipelineDocument {
        name: "cap-then-tag".to_string(),
        stages: vec![
            StageConfig {
                processor: Config::new("count", json!({"limit": 2})),
                condition: None,
                ignore_errors: false,
            },
            StageConfig {
                processor: Config::new("insert", json!({"set_key": "seen", "value": true})),
                condition: None,
                ignore_errors: false,
            },
        ],
    };

    let pipeline = Pipeline::from_document(&document).unwrap();
    let batch = vec![
        Capsule::new(br#"{"i":1}"#.to_vec()),
        Capsule::new(br#"{"i":2}"#.to_vec()),
        Capsule::new(br#"{"i":3}"#.to_vec()),
    ];
    let out = pipeline.run(batch).unwrap();

    assert_eq!(out.len(), 2);
    for capsule in &out {
        assert_eq!(capsule.get("seen").unwrap(), json!(true));
    }
}
