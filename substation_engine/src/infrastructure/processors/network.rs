// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Network-aware appliers: `domain` (hostname decomposition) and `dns`
//! (forward/reverse lookup and TXT query).

use std::net::IpAddr;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use serde::Deserialize;
use serde_json::Value;

use substation_core::config::validate_data_pattern;
use substation_core::{Applier, Capsule, Config, ProcessorBase, SubstationError};

// --- domain -------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DomainSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
}

/// Splits a hostname into its registered domain and subdomain labels. Uses a
/// plain two-label heuristic (`"a.b.example.com"` -> domain `"example.com"`,
/// subdomain `"a.b"`) rather than a public-suffix list, since the pipeline
/// only needs a coarse split, not exact eTLD+1 semantics.
pub struct DomainProcessor {
    settings: DomainSettings,
}

impl DomainProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: DomainSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        Ok(Self { settings })
    }
}

fn split_domain(hostname: &str) -> (String, String) {
    let labels: Vec<&str> = hostname.trim_end_matches('.').split('.').collect();
    if labels.len() <= 2 {
        return (String::new(), hostname.to_string());
    }
    let domain = labels[labels.len() - 2..].join(".");
    let subdomain = labels[..labels.len() - 2].join(".");
    (subdomain, domain)
}

impl Applier for DomainProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let hostname = value.as_str().unwrap_or_default();
        let (subdomain, domain) = split_domain(hostname);

        let mut out = capsule.clone();
        if self.settings.set_key.is_empty() {
            out.set_value("", Value::String(domain))?;
        } else {
            out.set(&format!("{}.domain", self.settings.set_key), Value::String(domain))?;
            out.set(&format!("{}.subdomain", self.settings.set_key), Value::String(subdomain))?;
        }
        Ok(out)
    }
}

impl ProcessorBase for DomainProcessor {
    fn name(&self) -> &'static str {
        "domain"
    }
}

// --- dns ------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnsLookupType {
    ForwardLookup,
    ReverseLookup,
    QueryTxt,
}

fn default_timeout_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct DnsSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    #[serde(rename = "type")]
    pub lookup_type: DnsLookupType,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Resolves a hostname or address against `type`: `forward_lookup` (A/AAAA
/// records), `reverse_lookup` (PTR record for an IP address), or
/// `query_txt` (TXT records). Raw-data mode keeps only the first result;
/// JSON-keyed mode writes every result as an array. Each lookup is bounded
/// by `timeout_ms` so a stalled resolver can't hang a stage.
pub struct DnsProcessor {
    settings: DnsSettings,
    runtime: tokio::runtime::Runtime,
    resolver: TokioAsyncResolver,
}

impl DnsProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: DnsSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| SubstationError::Internal(format!("dns: failed to start resolver runtime: {e}")))?;
        let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        Ok(Self { settings, runtime, resolver })
    }

    fn resolve(&self, subject: &str) -> Result<Vec<String>, SubstationError> {
        let timeout = Duration::from_millis(self.settings.timeout_ms);

        self.runtime.block_on(async {
            match self.settings.lookup_type {
                DnsLookupType::ForwardLookup => {
                    let lookup = tokio::time::timeout(timeout, self.resolver.lookup_ip(subject))
                        .await
                        .map_err(|e| SubstationError::for_processor("dns", e))?
                        .map_err(|e| SubstationError::for_processor("dns", e))?;
                    Ok(lookup.iter().map(|ip| ip.to_string()).collect())
                }
                DnsLookupType::ReverseLookup => {
                    let addr: IpAddr = subject
                        .parse()
                        .map_err(|e| SubstationError::for_processor("dns", format!("invalid ip address: {e}")))?;
                    let lookup = tokio::time::timeout(timeout, self.resolver.reverse_lookup(addr))
                        .await
                        .map_err(|e| SubstationError::for_processor("dns", e))?
                        .map_err(|e| SubstationError::for_processor("dns", e))?;
                    Ok(lookup.iter().map(|name| name.to_string()).collect())
                }
                DnsLookupType::QueryTxt => {
                    let lookup = tokio::time::timeout(timeout, self.resolver.txt_lookup(subject))
                        .await
                        .map_err(|e| SubstationError::for_processor("dns", e))?
                        .map_err(|e| SubstationError::for_processor("dns", e))?;
                    Ok(lookup.iter().map(|txt| txt.to_string()).collect())
                }
            }
        })
    }
}

impl Applier for DnsProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().unwrap_or_default();

        let results = self.resolve(subject)?;

        let mut out = capsule.clone();
        if self.settings.set_key.is_empty() {
            let first = results.first().cloned().unwrap_or_default();
            out.set_value("", Value::String(first))?;
        } else {
            let array = Value::Array(results.into_iter().map(Value::String).collect());
            out.set(&self.settings.set_key, array)?;
        }
        Ok(out)
    }
}

impl ProcessorBase for DnsProcessor {
    fn name(&self) -> &'static str {
        "dns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_domain_separates_subdomain_from_registered_domain() {
        let (sub, domain) = split_domain("a.b.example.com");
        assert_eq!(sub, "a.b");
        assert_eq!(domain, "example.com");
    }

    #[test]
    fn split_domain_bare_domain_has_no_subdomain() {
        let (sub, domain) = split_domain("example.com");
        assert_eq!(sub, "");
        assert_eq!(domain, "example.com");
    }

    #[test]
    fn domain_processor_writes_raw_payload_when_unkeyed() {
        let processor = DomainProcessor::new(&Config::new("domain", serde_json::json!({}))).unwrap();
        let out = processor.apply(&Capsule::new(b"a.example.com".to_vec())).unwrap();
        assert_eq!(out.data(), b"example.com");
    }

    #[test]
    fn dns_rejects_an_unrecognized_lookup_type_at_construction() {
        let result = DnsProcessor::new(&Config::new(
            "dns",
            serde_json::json!({"key": "host", "set_key": "ips", "type": "bogus_lookup"}),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn dns_settings_default_timeout_is_one_second() {
        let settings: DnsSettings = serde_json::from_value(serde_json::json!({"type": "forward_lookup"})).unwrap();
        assert_eq!(settings.timeout_ms, 1000);
    }
}
