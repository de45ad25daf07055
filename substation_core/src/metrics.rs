// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metrics Port
//!
//! The transform stage and its processors emit counters (`CapsulesReceived`,
//! `CapsulesSent`, `ProcessorErrors`, ...) through this port rather than
//! depending on a concrete metrics backend directly. `substation_engine`
//! provides the Prometheus-backed implementation; tests can use an in-memory
//! stub.

use async_trait::async_trait;

/// One metric observation: a name, an integer delta, and the tag set that
/// labels it (e.g. `pipeline`, `stage`, `processor`).
#[derive(Debug, Clone)]
pub struct MetricsData {
    pub name: String,
    pub value: i64,
    pub tags: Vec<(String, String)>,
}

impl MetricsData {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }
}

/// Sink for pipeline metrics. Emission failures are always ignored by
/// callers — metrics are an observability concern, never a reason to fail a
/// pipeline.
#[async_trait]
pub trait MetricsPort: Send + Sync {
    async fn emit(&self, data: MetricsData);
}

/// A `MetricsPort` that discards every observation. Used where a metrics
/// sink is required by a signature but not under test.
pub struct NoOpMetrics;

#[async_trait]
impl MetricsPort for NoOpMetrics {
    async fn emit(&self, _data: MetricsData) {}
}
