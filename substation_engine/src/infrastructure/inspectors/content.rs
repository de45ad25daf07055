// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Content-type inspector: sniffs a capsule's raw bytes for a MIME type via
//! magic-byte detection and compares it against an expected type.

use serde::Deserialize;

use substation_core::inspector::apply_negate;
use substation_core::{Capsule, Config, Inspector, InspectorBase, SubstationError};

#[derive(Debug, Clone, Deserialize)]
pub struct ContentSettings {
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default)]
    pub negate: bool,
}

/// Always operates on the whole capsule payload — content sniffing a single
/// JSON field wouldn't make sense, so there is no `key`/`set_key` pair here.
pub struct ContentInspector {
    settings: ContentSettings,
}

impl ContentInspector {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        Ok(Self {
            settings: config.parse_settings()?,
        })
    }
}

impl Inspector for ContentInspector {
    fn inspect(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        let detected = infer::get(capsule.data()).map(|kind| kind.mime_type());
        let is_json_expected = self.settings.mime_type == "application/json";
        let result = match detected {
            Some(mime) => mime == self.settings.mime_type,
            // `infer` has no JSON magic bytes to sniff; fall back to a parse
            // check so `application/json` remains a usable target type.
            None if is_json_expected => capsule.is_valid_json(),
            None => false,
        };
        Ok(apply_negate(result, self.settings.negate))
    }
}

impl InspectorBase for ContentInspector {
    fn name(&self) -> &'static str {
        "content"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_gzip_magic_bytes() {
        let cfg = Config::new("content", json!({"type": "application/gzip"}));
        let inspector = ContentInspector::new(&cfg).unwrap();
        let gzip_magic: &[u8] = &[0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(inspector.inspect(&Capsule::new(gzip_magic.to_vec())).unwrap());
    }

    #[test]
    fn falls_back_to_json_parse_check() {
        let cfg = Config::new("content", json!({"type": "application/json"}));
        let inspector = ContentInspector::new(&cfg).unwrap();
        assert!(inspector.inspect(&Capsule::new(br#"{"a":1}"#.to_vec())).unwrap());
        assert!(!inspector.inspect(&Capsule::new(b"not json".to_vec())).unwrap());
    }
}
