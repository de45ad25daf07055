// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Transform Stage
//!
//! Drives capsules from a bounded input channel through a built
//! [`Pipeline`], one at a time, and forwards the results to a bounded output
//! channel. Respects cooperative cancellation via
//! [`substation_bootstrap::shutdown::CancellationToken`] and emits
//! `CapsulesReceived`/`CapsulesSent`/`ProcessorErrors` metrics as it goes.

use std::sync::Arc;

use substation_bootstrap::shutdown::CancellationToken;
use substation_core::{MetricsData, MetricsPort, SubstationError};
use tokio::sync::mpsc;

use super::pipeline::Pipeline;

/// A stage's lifecycle. `idle` until the first capsule arrives, `draining`
/// while actively forwarding, and a terminal `done` (input closed cleanly)
/// or `failed` (cancellation or an unrecoverable pipeline error) once `run`
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Idle,
    Draining,
    Done,
    Failed,
}

/// Runs a [`Pipeline`] against a stream of capsules arriving over a channel.
pub struct TransformStage {
    pipeline: Arc<Pipeline>,
    metrics: Arc<dyn MetricsPort>,
    state: std::sync::atomic::AtomicU8,
}

impl TransformStage {
    pub fn new(pipeline: Arc<Pipeline>, metrics: Arc<dyn MetricsPort>) -> Self {
        Self { pipeline, metrics, state: std::sync::atomic::AtomicU8::new(StageState::Idle as u8) }
    }

    /// The stage's current lifecycle state, updated as `run` progresses.
    pub fn state(&self) -> StageState {
        match self.state.load(std::sync::atomic::Ordering::Acquire) {
            0 => StageState::Idle,
            1 => StageState::Draining,
            2 => StageState::Done,
            _ => StageState::Failed,
        }
    }

    fn set_state(&self, state: StageState) {
        self.state.store(state as u8, std::sync::atomic::Ordering::Release);
    }

    /// Consumes `input` until it closes or `cancellation` fires, running
    /// every capsule through the pipeline and forwarding results to
    /// `output`. A pipeline error aborts the stage unless the failing
    /// stage's `ignore_errors` already absorbed it — by the time an error
    /// reaches here it is always stage-fatal.
    pub async fn run(
        &self,
        mut input: mpsc::Receiver<substation_core::Capsule>,
        output: mpsc::Sender<substation_core::Capsule>,
        cancellation: CancellationToken,
    ) -> Result<(), SubstationError> {
        loop {
            tokio::select! {
                _ = cancellation.cancelled() => {
                    tracing::info!(pipeline = self.pipeline.name(), "transform stage cancelled");
                    self.set_state(StageState::Failed);
                    return Err(SubstationError::Cancelled("transform stage cancelled".to_string()));
                }
                received = input.recv() => {
                    let Some(capsule) = received else {
                        tracing::debug!(pipeline = self.pipeline.name(), "input channel closed, stopping");
                        self.set_state(StageState::Done);
                        return Ok(());
                    };
                    self.set_state(StageState::Draining);
                    self.emit(MetricsData::new("CapsulesReceived", 1).with_tag("pipeline", self.pipeline.name())).await;

                    match self.pipeline.run(vec![capsule]) {
                        Ok(results) => {
                            let sent = results.len() as i64;
                            for capsule in results {
                                if output.send(capsule).await.is_err() {
                                    tracing::debug!(pipeline = self.pipeline.name(), "output channel closed, stopping");
                                    self.set_state(StageState::Done);
                                    return Ok(());
                                }
                            }
                            self.emit(MetricsData::new("CapsulesSent", sent).with_tag("pipeline", self.pipeline.name())).await;
                        }
                        Err(err) => {
                            self.emit(MetricsData::new("ProcessorErrors", 1).with_tag("pipeline", self.pipeline.name())).await;
                            self.set_state(StageState::Failed);
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    async fn emit(&self, data: MetricsData) {
        self.metrics.emit(data).await;
    }
}
