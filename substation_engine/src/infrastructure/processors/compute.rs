// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Computational appliers: `hash`, `math`, `time`, `gzip`.

use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use md5::Md5;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use substation_core::config::validate_data_pattern;
use substation_core::{Applier, Capsule, Config, ProcessorBase, SubstationError};

// --- hash -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    Md5,
    Sha256,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HashSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    pub algorithm: HashAlgorithm,
}

pub struct HashProcessor {
    settings: HashSettings,
}

impl HashProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: HashSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        Ok(Self { settings })
    }
}

impl Applier for HashProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = capsule.get_value(&self.settings.key)?;
        let subject = value.as_str().map(str::as_bytes).unwrap_or(capsule.data());

        let digest = match self.settings.algorithm {
            HashAlgorithm::Md5 => {
                let mut hasher = Md5::new();
                hasher.update(subject);
                hex::encode(hasher.finalize())
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(subject);
                hex::encode(hasher.finalize())
            }
        };

        let mut out = capsule.clone();
        out.set_value(&self.settings.set_key, Value::String(digest))?;
        Ok(out)
    }
}

impl ProcessorBase for HashProcessor {
    fn name(&self) -> &'static str {
        "hash"
    }
}

// --- math -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MathSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    pub operation: MathOperation,
}

/// Applies an arithmetic operation across a JSON array of numbers, reducing
/// it to a single result (e.g. `add` on `[2,3]` yields `5`). Keyed-or-raw
/// like every other applier: in raw mode the whole payload must decode to
/// an array of numbers.
pub struct MathProcessor {
    settings: MathSettings,
}

impl MathProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: MathSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        Ok(Self { settings })
    }
}

fn reduce_numbers(numbers: &[f64], operation: MathOperation) -> Result<f64, SubstationError> {
    let mut iter = numbers.iter();
    let mut acc = *iter
        .next()
        .ok_or_else(|| SubstationError::for_processor("math", "array must contain at least one number"))?;

    for &n in iter {
        acc = match operation {
            MathOperation::Add => acc + n,
            MathOperation::Subtract => acc - n,
            MathOperation::Multiply => acc * n,
            MathOperation::Divide => {
                if n == 0.0 {
                    return Err(SubstationError::for_processor("math", "division by zero"));
                }
                acc / n
            }
        };
    }
    Ok(acc)
}

impl Applier for MathProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let value = if self.settings.key.is_empty() {
            capsule.as_json()?
        } else {
            capsule.get(&self.settings.key)?
        };

        let array = value
            .as_array()
            .ok_or_else(|| SubstationError::for_processor("math", "field is not an array of numbers"))?;
        let numbers = array
            .iter()
            .map(|v| v.as_f64().ok_or_else(|| SubstationError::for_processor("math", "array element is not numeric")))
            .collect::<Result<Vec<_>, _>>()?;

        let result = reduce_numbers(&numbers, self.settings.operation)?;
        let number = serde_json::Number::from_f64(result).map(Value::Number).unwrap_or(Value::Null);

        let mut out = capsule.clone();
        out.set_value(&self.settings.set_key, number)?;
        Ok(out)
    }
}

impl ProcessorBase for MathProcessor {
    fn name(&self) -> &'static str {
        "math"
    }
}

// --- time -----------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TimeSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub set_key: String,
    /// `chrono` strftime format string; absent means "now" instead of a
    /// parsed field.
    #[serde(default)]
    pub format: Option<String>,
}

/// Either stamps the current UTC time (`key` empty) or reformats an
/// RFC 3339 timestamp already present in the capsule.
pub struct TimeProcessor {
    settings: TimeSettings,
}

impl TimeProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        let settings: TimeSettings = config.parse_settings()?;
        validate_data_pattern(&settings.key, &settings.set_key)?;
        Ok(Self { settings })
    }
}

impl Applier for TimeProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let when: DateTime<Utc> = if self.settings.key.is_empty() {
            let epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_err(|e| SubstationError::for_processor("time", e))?;
            DateTime::from_timestamp(epoch.as_secs() as i64, epoch.subsec_nanos())
                .ok_or_else(|| SubstationError::for_processor("time", "system clock out of range"))?
        } else {
            let value = capsule.get_value(&self.settings.key)?;
            let raw = value.as_str().unwrap_or_default();
            DateTime::parse_from_rfc3339(raw)
                .map_err(|e| SubstationError::for_processor("time", e))?
                .with_timezone(&Utc)
        };

        let formatted = match &self.settings.format {
            Some(fmt) => when.format(fmt).to_string(),
            None => when.to_rfc3339(),
        };

        let mut out = capsule.clone();
        out.set_value(&self.settings.set_key, Value::String(formatted))?;
        Ok(out)
    }
}

impl ProcessorBase for TimeProcessor {
    fn name(&self) -> &'static str {
        "time"
    }
}

// --- gzip -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GzipDirection {
    Compress,
    Decompress,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GzipSettings {
    pub direction: GzipDirection,
}

/// Compresses or decompresses the whole raw payload. Always whole-payload:
/// gzip operates on bytes, not a JSON field.
pub struct GzipProcessor {
    settings: GzipSettings,
}

impl GzipProcessor {
    pub fn new(config: &Config) -> Result<Self, SubstationError> {
        Ok(Self {
            settings: config.parse_settings()?,
        })
    }
}

impl Applier for GzipProcessor {
    fn apply(&self, capsule: &Capsule) -> Result<Capsule, SubstationError> {
        let transformed = match self.settings.direction {
            GzipDirection::Compress => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder
                    .write_all(capsule.data())
                    .map_err(|e| SubstationError::for_processor("gzip", e))?;
                encoder.finish().map_err(|e| SubstationError::for_processor("gzip", e))?
            }
            GzipDirection::Decompress => {
                let mut decoder = GzDecoder::new(capsule.data());
                let mut buf = Vec::new();
                decoder
                    .read_to_end(&mut buf)
                    .map_err(|e| SubstationError::for_processor("gzip", e))?;
                buf
            }
        };

        let mut out = capsule.clone();
        out.set_data(transformed);
        Ok(out)
    }
}

impl ProcessorBase for GzipProcessor {
    fn name(&self) -> &'static str {
        "gzip"
    }
}
