// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Random-sampling inspector: passes a configurable fraction of capsules
//! regardless of their content. Useful for cheaply down-sampling a noisy
//! stream before an expensive downstream processor.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use substation_core::inspector::apply_negate;
use substation_core::{Capsule, Config, Inspector, InspectorBase, SubstationError};

#[derive(Debug, Clone, Deserialize)]
pub struct RandomSettings {
    /// Fraction of capsules that should pass, in `[0.0, 1.0]`.
    pub rate: f64,
    #[serde(default)]
    pub negate: bool,
}

pub struct RandomInspector {
    settings: RandomSettings,
    rng: Mutex<StdRng>,
}

impl RandomInspector {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: RandomSettings = config.parse_settings()?;
        if !(0.0..=1.0).contains(&settings.rate) {
            return Err(SubstationError::InvalidOption("random.rate must be in [0.0, 1.0]".to_string()));
        }
        Ok(Self {
            settings,
            rng: Mutex::new(StdRng::from_rng(&mut rand::rng())),
        })
    }
}

impl Inspector for RandomInspector {
    fn inspect(&self, _capsule: &Capsule) -> Result<bool, SubstationError> {
        let sample: f64 = self.rng.lock().expect("random inspector rng mutex poisoned").random();
        Ok(apply_negate(sample < self.settings.rate, self.settings.negate))
    }
}

impl InspectorBase for RandomInspector {
    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rate_zero_never_passes() {
        let inspector = RandomInspector::new(&Config::new("random", json!({"rate": 0.0}))).unwrap();
        for _ in 0..50 {
            assert!(!inspector.inspect(&Capsule::new(b"".to_vec())).unwrap());
        }
    }

    #[test]
    fn rate_one_always_passes() {
        let inspector = RandomInspector::new(&Config::new("random", json!({"rate": 1.0}))).unwrap();
        for _ in 0..50 {
            assert!(inspector.inspect(&Capsule::new(b"".to_vec())).unwrap());
        }
    }

    #[test]
    fn out_of_range_rate_is_rejected() {
        assert!(RandomInspector::new(&Config::new("random", json!({"rate": 1.5}))).is_err());
    }
}
