// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! CIDR-membership inspector.

use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use serde::Deserialize;

use substation_core::config::validate_data_pattern;
use substation_core::inspector::apply_negate;
use substation_core::{Capsule, Config, Inspector, InspectorBase, SubstationError};

#[derive(Debug, Clone, Deserialize)]
pub struct IpSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    /// CIDR ranges the subject's address must fall within (`any` semantics
    /// across the list — a single match is enough).
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub negate: bool,
}

pub struct IpInspector {
    settings: IpSettings,
    networks: Vec<IpNetwork>,
}

impl IpInspector {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: IpSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        if settings.networks.is_empty() {
            return Err(SubstationError::MissingRequiredOptions(
                "ip requires at least one network".to_string(),
            ));
        }
        let networks = settings
            .networks
            .iter()
            .map(|n| IpNetwork::from_str(n).map_err(|e| SubstationError::InvalidOption(format!("ip: {n}: {e}"))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { settings, networks })
    }
}

impl Inspector for IpInspector {
    fn inspect(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().unwrap_or_default();

        let result = match IpAddr::from_str(subject) {
            Ok(addr) => self.networks.iter().any(|net| net.contains(addr)),
            Err(_) => false,
        };

        Ok(apply_negate(result, self.settings.negate))
    }
}

impl InspectorBase for IpInspector {
    fn name(&self) -> &'static str {
        "ip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matches_address_within_network() {
        let cfg = Config::new("ip", json!({"networks": ["10.0.0.0/8"]}));
        let inspector = IpInspector::new(&cfg).unwrap();
        assert!(inspector.inspect(&Capsule::new(b"10.1.2.3".to_vec())).unwrap());
        assert!(!inspector.inspect(&Capsule::new(b"192.168.1.1".to_vec())).unwrap());
    }

    #[test]
    fn malformed_address_is_not_a_match() {
        let cfg = Config::new("ip", json!({"networks": ["10.0.0.0/8"]}));
        let inspector = IpInspector::new(&cfg).unwrap();
        assert!(!inspector.inspect(&Capsule::new(b"not-an-ip".to_vec())).unwrap());
    }

    #[test]
    fn empty_network_list_is_a_construction_error() {
        let cfg = Config::new("ip", json!({"networks": []}));
        assert!(IpInspector::new(&cfg).is_err());
    }
}
