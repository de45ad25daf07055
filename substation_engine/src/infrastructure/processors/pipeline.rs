// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `pipeline` applier: runs a capsule through a nested sequence of other
//! appliers, letting a declarative document compose small processors into
//! one reusable unit instead of repeating them across many stages.

use std::sync::Arc;

use serde::Deserialize;

use substation_core::{Applier, Capsule, Config, ProcessorBase, SubstationError};

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub processors: Vec<Config>,
}

/// Runs its inner appliers in declaration order against a single capsule.
/// The inner appliers are built by the registry and handed in already
/// constructed, mirroring
/// [`crate::infrastructure::inspectors::for_each::ForEachInspector`]'s
/// recursive-construction pattern.
pub struct PipelineProcessor {
    inner: Vec<Arc<dyn Applier>>,
}

impl PipelineProcessor {
    pub fn new(config: &Config, inner: Vec<Arc<dyn Applier>>) -> Result<Self, SubstationError> {
        let settings: PipelineSettings = config.parse_settings()?;
        if inner.len() != settings.processors.len() {
            return Err(SubstationError::Internal(
                "pipeline: built processor count does not match configured processor count".to_string(),
            ));
        }
        Ok(Self { inner })
    }

    /// The nested processor configs the registry must build, in order,
    /// before calling [`Self::new`].
    pub fn inner_configs(config: &Config) -> Result<Vec<Config>, SubstationError> {
        let settings: PipelineSettings = config.parse_settings()?;
        Ok(settings.processors)
    }
}

impl Applier for PipelineProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let mut current = capsule.clone();
        for processor in &self.inner {
            current = processor.apply(&current)?;
        }
        Ok(current)
    }
}

impl ProcessorBase for PipelineProcessor {
    fn name(&self) -> &'static str {
        "pipeline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct AddOne;
    impl Applier for AddOne {
        fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
            let n = capsule.as_json()?.as_i64().unwrap_or(0) + 1;
            Capsule::from_json(&json!(n))
        }
    }

    #[test]
    fn runs_inner_processors_in_order() {
        let cfg = Config::new(
            "pipeline",
            json!({"processors": [{"type": "noop", "settings": {}}, {"type": "noop", "settings": {}}]}),
        );
        let processor = PipelineProcessor::new(&cfg, vec![Arc::new(AddOne), Arc::new(AddOne)]).unwrap();
        let out = processor.apply(&Capsule::from_json(&json!(0)).unwrap()).unwrap();
        assert_eq!(out.as_json().unwrap(), json!(2));
    }

    #[test]
    fn mismatched_inner_count_is_construction_error() {
        let cfg = Config::new("pipeline", json!({"processors": [{"type": "noop", "settings": {}}]}));
        assert!(PipelineProcessor::new(&cfg, vec![]).is_err());
    }
}
