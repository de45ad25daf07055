// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Registry
//!
//! Maps the declarative `type` tag of a [`Config`] to a concrete
//! [`Inspector`], [`Applier`], or [`Batcher`] implementation. This is the one
//! place that knows every inspector and processor kind that exists; the
//! transform stage and pipeline document loader never match on `type`
//! strings themselves.
//!
//! `for_each` and `pipeline` nest other configs inside their own settings.
//! Because building those inner pieces means calling back into this same
//! registry, their inspector/processor constructors take an
//! already-built inner value rather than a `Config` — this module is the
//! only one that performs the recursive lookup.

use std::sync::Arc;

use substation_core::{Applier, Batcher, Config, Inspector, Operator, OperatorType, SubstationError};

use crate::infrastructure::config::ConditionConfig;
use crate::infrastructure::inspectors::{content, for_each, ip, json, length, pattern, random, strings};
use crate::infrastructure::processors::{batch, compute, network, pipeline, structure, text};

/// A built processor is either an [`Applier`] (one capsule in, one out) or a
/// [`Batcher`] (a whole batch in, a possibly different-sized batch out).
/// Stage execution dispatches on this instead of assuming every processor
/// kind is an applier.
pub enum Processor {
    Applier(Arc<dyn Applier>),
    Batcher(Arc<dyn Batcher>),
}

/// Builds the [`Inspector`] named by `config.kind`.
pub fn build_inspector(config: &Config) -> Result<Arc<dyn Inspector>, SubstationError> {
    let inspector: Arc<dyn Inspector> = match config.kind.as_str() {
        "pattern" => Arc::new(pattern::PatternInspector::new(config)?),
        "length" => Arc::new(length::LengthInspector::new(config)?),
        "strings" => Arc::new(strings::StringsInspector::new(config)?),
        "ip" => Arc::new(ip::IpInspector::new(config)?),
        "content" => Arc::new(content::ContentInspector::new(config)?),
        "json_valid" => Arc::new(json::JsonValidInspector::new(config)?),
        "json_schema" => Arc::new(json::JsonSchemaInspector::new(config)?),
        "random" => Arc::new(random::RandomInspector::new(config)?),
        "for_each" => {
            let inner_config = for_each::ForEachInspector::inner_config(config)?;
            let inner = build_inspector(&inner_config)?;
            Arc::new(for_each::ForEachInspector::new(config, inner)?)
        }
        other => return Err(SubstationError::InvalidFactoryInput(other.to_string())),
    };
    Ok(inspector)
}

/// Builds the [`Operator`] described by a stage's gating condition, one
/// inspector per entry in `condition.inspectors`.
pub fn build_operator(condition: &ConditionConfig) -> Result<Operator, SubstationError> {
    let kind = OperatorType::parse(&condition.operator)?;
    let inspectors = condition
        .inspectors
        .iter()
        .map(build_inspector)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Operator::new(kind, inspectors, condition.negate))
}

/// Builds the [`Applier`] named by `config.kind`. Fails with
/// [`SubstationError::InvalidFactoryInput`] for a batcher kind — use
/// [`build_processor`] when a stage's processor could be either.
pub fn build_applier(config: &Config) -> Result<Arc<dyn Applier>, SubstationError> {
    let applier: Arc<dyn Applier> = match config.kind.as_str() {
        "base64" => Arc::new(text::Base64Processor::new(config)?),
        "case" => Arc::new(text::CaseProcessor::new(config)?),
        "replace" => Arc::new(text::ReplaceProcessor::new(config)?),
        "join" => Arc::new(text::JoinProcessor::new(config)?),
        "capture" => Arc::new(text::CaptureProcessor::new(config)?),
        "copy" => Arc::new(structure::CopyProcessor::new(config)?),
        "delete" => Arc::new(structure::DeleteProcessor::new(config)?),
        "insert" => Arc::new(structure::InsertProcessor::new(config)?),
        "convert" => Arc::new(structure::ConvertProcessor::new(config)?),
        "expand" => Arc::new(structure::ExpandProcessor::new(config)?),
        "flatten" => Arc::new(structure::FlattenProcessor::new(config)?),
        "domain" => Arc::new(network::DomainProcessor::new(config)?),
        "dns" => Arc::new(network::DnsProcessor::new(config)?),
        "hash" => Arc::new(compute::HashProcessor::new(config)?),
        "math" => Arc::new(compute::MathProcessor::new(config)?),
        "time" => Arc::new(compute::TimeProcessor::new(config)?),
        "gzip" => Arc::new(compute::GzipProcessor::new(config)?),
        "for_each" => {
            let inner_config = structure::ForEachProcessor::inner_config(config)?;
            let inner = build_applier(&inner_config)?;
            Arc::new(structure::ForEachProcessor::new(config, inner)?)
        }
        "pipeline" => {
            let inner_configs = pipeline::PipelineProcessor::inner_configs(config)?;
            let inner = inner_configs.iter().map(build_applier).collect::<Result<Vec<_>, _>>()?;
            Arc::new(pipeline::PipelineProcessor::new(config, inner)?)
        }
        other => return Err(SubstationError::InvalidFactoryInput(other.to_string())),
    };
    Ok(applier)
}

/// Builds the [`Batcher`] named by `config.kind`.
pub fn build_batcher(config: &Config) -> Result<Arc<dyn Batcher>, SubstationError> {
    let batcher: Arc<dyn Batcher> = match config.kind.as_str() {
        "aggregate" => Arc::new(batch::AggregateProcessor::new(config)?),
        "drop" => {
            let condition = batch::DropProcessor::condition_config(config)?;
            let operator = build_operator(&condition)?;
            Arc::new(batch::DropProcessor::new(config, operator)?)
        }
        "count" => Arc::new(batch::CountProcessor::new(config)?),
        other => return Err(SubstationError::InvalidFactoryInput(other.to_string())),
    };
    Ok(batcher)
}

const BATCHER_KINDS: &[&str] = &["aggregate", "drop", "count"];

/// Builds whichever of [`Applier`]/[`Batcher`] `config.kind` names, for
/// callers (the transform stage, the pipeline document loader) that accept
/// either.
pub fn build_processor(config: &Config) -> Result<Processor, SubstationError> {
    if BATCHER_KINDS.contains(&config.kind.as_str()) {
        Ok(Processor::Batcher(build_batcher(config)?))
    } else {
        Ok(Processor::Applier(build_applier(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_known_inspector_kind() {
        let cfg = Config::new("length", json!({"min": 1}));
        assert!(build_inspector(&cfg).is_ok());
    }

    #[test]
    fn unknown_inspector_kind_is_factory_error() {
        let cfg = Config::new("not-a-real-kind", json!({}));
        assert!(matches!(build_inspector(&cfg), Err(SubstationError::InvalidFactoryInput(_))));
    }

    #[test]
    fn builds_nested_for_each_inspector() {
        let cfg = Config::new(
            "for_each",
            json!({
                "key": "items", "set_key": "items", "type": "all",
                "inspector": {"type": "length", "settings": {"min": 1}}
            }),
        );
        assert!(build_inspector(&cfg).is_ok());
    }

    #[test]
    fn builds_known_applier_kind() {
        let cfg = Config::new("replace", json!({"old": "a", "new": "b"}));
        assert!(build_applier(&cfg).is_ok());
    }

    #[test]
    fn batcher_kind_is_rejected_by_build_applier() {
        let cfg = Config::new("count", json!({"limit": 1}));
        assert!(build_applier(&cfg).is_err());
    }

    #[test]
    fn build_processor_dispatches_by_kind() {
        let applier_cfg = Config::new("replace", json!({"old": "a", "new": "b"}));
        assert!(matches!(build_processor(&applier_cfg).unwrap(), Processor::Applier(_)));

        let batcher_cfg = Config::new("count", json!({"limit": 1}));
        assert!(matches!(build_processor(&batcher_cfg).unwrap(), Processor::Batcher(_)));
    }

    #[test]
    fn build_operator_reduces_over_condition_inspectors() {
        let condition = ConditionConfig {
            operator: "all".to_string(),
            negate: false,
            inspectors: vec![Config::new("length", json!({"min": 1}))],
        };
        let operator = build_operator(&condition).unwrap();
        let capsule = substation_core::Capsule::new(b"hello".to_vec());
        assert!(operator.operate(&capsule).unwrap());
    }
}
