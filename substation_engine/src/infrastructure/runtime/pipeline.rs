// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline
//!
//! A built, runnable pipeline: an ordered list of stages, each carrying a
//! processor, an optional gating condition, and the `ignore_errors` policy
//! for that stage. Built once from a [`PipelineDocument`] and then reused
//! for every capsule batch the transform stage receives.

use substation_core::{Capsule, Operator, SubstationError};

use crate::infrastructure::config::PipelineDocument;
use crate::infrastructure::registry::{self, Processor};

/// One outcome of running a capsule through a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage's processor ran and transformed the capsule.
    Applied,
    /// The stage's condition evaluated `false`; the capsule passed through
    /// unchanged.
    Skipped,
    /// The processor failed but `ignore_errors` was set, so the capsule
    /// passed through unchanged.
    Ignored,
}

struct Stage {
    name: String,
    processor: Processor,
    condition: Option<Operator>,
    ignore_errors: bool,
}

/// A fully built pipeline, ready to run capsules through its stages.
pub struct Pipeline {
    name: String,
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Builds every stage's processor and condition via the registry. Fails
    /// fast on the first unrecognized processor/inspector kind or invalid
    /// option — a pipeline either builds completely or not at all.
    pub fn from_document(document: &PipelineDocument) -> Result<Self, SubstationError> {
        let mut stages = Vec::with_capacity(document.stages.len());
        for stage in &document.stages {
            let processor = registry::build_processor(&stage.processor)?;
            let condition = stage
                .condition
                .as_ref()
                .map(registry::build_operator)
                .transpose()?;
            stages.push(Stage {
                name: stage.processor.kind.clone(),
                processor,
                condition,
                ignore_errors: stage.ignore_errors,
            });
        }
        Ok(Self {
            name: document.name.clone(),
            stages,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs a batch of capsules through every stage in order. Applier
    /// stages transform capsules one at a time, gated by their condition;
    /// batcher stages reshape the whole in-flight batch and ignore the
    /// stage-level condition, since "does this one capsule match" doesn't
    /// apply uniformly to an operation that merges or caps across the set.
    /// A batcher that does need a per-record condition (`drop`) carries its
    /// own [`Operator`] internally instead.
    pub fn run(&self, capsules: Vec<Capsule>) -> Result<Vec<Capsule>, SubstationError> {
        let mut batch = capsules;
        for stage in &self.stages {
            batch = stage.run(batch)?;
        }
        Ok(batch)
    }
}

impl Stage {
    fn run(&self, batch: Vec<Capsule>) -> Result<Vec<Capsule>, SubstationError> {
        match &self.processor {
            Processor::Applier(applier) => {
                let mut out = Vec::with_capacity(batch.len());
                for capsule in batch {
                    let (transformed, _outcome) = self.apply_one(applier.as_ref(), capsule)?;
                    out.push(transformed);
                }
                Ok(out)
            }
            Processor::Batcher(batcher) => {
                if self.ignore_errors {
                    Ok(batcher.apply_batch(batch.clone()).unwrap_or(batch))
                } else {
                    batcher.apply_batch(batch)
                }
            }
        }
    }

    fn apply_one(
        &self,
        applier: &dyn substation_core::Applier,
        capsule: Capsule,
    ) -> Result<(Capsule, StageOutcome), SubstationError> {
        if let Some(condition) = &self.condition {
            if !condition.operate(&capsule)? {
                return Ok((capsule, StageOutcome::Skipped));
            }
        }

        match applier.apply(&capsule) {
            Ok(transformed) => Ok((transformed, StageOutcome::Applied)),
            Err(err) if self.ignore_errors => {
                tracing::debug!(stage = %self.name, error = %err, "ignoring stage error");
                Ok((capsule, StageOutcome::Ignored))
            }
            Err(err) => Err(err),
        }
    }
}
