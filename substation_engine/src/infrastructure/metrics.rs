// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metrics Service
//!
//! Prometheus-based implementation of [`substation_core::MetricsPort`]. The
//! transform stage and processors emit named counters (`CapsulesReceived`,
//! `CapsulesSent`, `ProcessorErrors`, ...); this service looks each one up
//! by name in a small fixed table built at construction time and increments
//! it by the observation's tagged value, falling back to a catch-all
//! counter for names outside that table so a processor added later doesn't
//! panic, only goes unlabeled in dashboards until it's added here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};
use tracing::debug;

use substation_core::{MetricsData, MetricsPort, SubstationError};

const TRACKED_METRICS: &[&str] = &[
    "CapsulesReceived",
    "CapsulesSent",
    "ProcessorErrors",
    "ConditionErrors",
    "CapsulesDropped",
    "CapsulesAggregated",
];

/// Prometheus-backed metrics sink for pipeline observability.
pub struct MetricsService {
    registry: Arc<Registry>,
    counters: HashMap<&'static str, IntCounterVec>,
    other: IntCounterVec,
}

impl MetricsService {
    /// Builds a fresh registry with one labeled counter per tracked metric
    /// name, plus a catch-all for anything unrecognized.
    pub fn new() -> Result<Self, SubstationError> {
        let registry = Registry::new();
        let mut counters = HashMap::new();

        for name in TRACKED_METRICS {
            let counter = IntCounterVec::new(
                Opts::new(metric_key(name), format!("Substation pipeline metric: {name}")).namespace("substation"),
                &["pipeline", "stage", "processor"],
            )
            .map_err(|e| SubstationError::Metrics(format!("failed to create {name} counter: {e}")))?;
            registry
                .register(Box::new(counter.clone()))
                .map_err(|e| SubstationError::Metrics(format!("failed to register {name} counter: {e}")))?;
            counters.insert(*name, counter);
        }

        let other = IntCounterVec::new(
            Opts::new("other_total", "Substation pipeline metrics outside the tracked set").namespace("substation"),
            &["name", "pipeline", "stage", "processor"],
        )
        .map_err(|e| SubstationError::Metrics(format!("failed to create catch-all counter: {e}")))?;
        registry
            .register(Box::new(other.clone()))
            .map_err(|e| SubstationError::Metrics(format!("failed to register catch-all counter: {e}")))?;

        Ok(Self {
            registry: Arc::new(registry),
            counters,
            other,
        })
    }

    /// The underlying Prometheus registry, for wiring an HTTP `/metrics`
    /// endpoint.
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }
}

fn metric_key(name: &str) -> String {
    // CapsulesReceived -> capsules_received_total
    let mut out = String::new();
    for (i, c) in name.char_indices() {
        if c.is_uppercase() && i != 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out.push_str("_total");
    out
}

fn tag<'a>(data: &'a MetricsData, key: &str) -> &'a str {
    data.tags
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

#[async_trait]
impl MetricsPort for MetricsService {
    async fn emit(&self, data: MetricsData) {
        let pipeline = tag(&data, "pipeline");
        let stage = tag(&data, "stage");
        let processor = tag(&data, "processor");

        match self.counters.get(data.name.as_str()) {
            Some(counter) => {
                counter
                    .with_label_values(&[pipeline, stage, processor])
                    .inc_by(data.value.max(0) as u64);
            }
            None => {
                debug!(metric = %data.name, "emitting untracked metric via catch-all counter");
                self.other
                    .with_label_values(&[&data.name, pipeline, stage, processor])
                    .inc_by(data.value.max(0) as u64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_key_converts_pascal_case() {
        assert_eq!(metric_key("CapsulesReceived"), "capsules_received_total");
        assert_eq!(metric_key("ProcessorErrors"), "processor_errors_total");
    }

    #[tokio::test]
    async fn emit_tracked_metric_increments_registered_counter() {
        let service = MetricsService::new().unwrap();
        service
            .emit(
                MetricsData::new("CapsulesSent", 3)
                    .with_tag("pipeline", "p1")
                    .with_tag("stage", "s1")
                    .with_tag("processor", "base64"),
            )
            .await;

        let families = service.registry().gather();
        let found = families.iter().any(|f| f.name() == "substation_capsules_sent_total");
        assert!(found);
    }

    #[tokio::test]
    async fn emit_untracked_metric_falls_back_to_catch_all() {
        let service = MetricsService::new().unwrap();
        service.emit(MetricsData::new("SomethingNew", 1)).await;

        let families = service.registry().gather();
        let found = families.iter().any(|f| f.name() == "substation_other_total");
        assert!(found);
    }
}
