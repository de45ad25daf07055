// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Error Taxonomy
//!
//! Sentinel error kinds shared by every inspector, processor, and the
//! transform stage. Construction-time errors (bad config, invalid data
//! pattern, missing required options) are distinguished from per-record
//! processing errors so callers can decide whether a failure is fatal to the
//! pipeline or just to one capsule.
//!
//! ## Propagation Policy
//!
//! - Construction-time errors are always fatal and bubble up to whoever is
//!   building the pipeline.
//! - Per-capsule processor errors respect `ignore_errors`: if set, the error
//!   is wrapped and handed to metrics/logging while the capsule passes
//!   through unchanged; otherwise it terminates the stage.
//! - Cancellation is surfaced verbatim via [`SubstationError::Cancelled`], not
//!   classified as a processor error.
//! - Metrics emission failures are always ignored by callers.

use thiserror::Error;

/// Domain-specific errors for the Substation pipeline engine.
#[derive(Error, Debug, Clone)]
pub enum SubstationError {
    /// Unknown `type` tag in a declarative config.
    #[error("invalid factory input: {0}")]
    InvalidFactoryInput(String),

    /// A known option was given a value outside its allowed set (e.g. an
    /// operator `type` that isn't `all`/`any`/`none`).
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A keyed processor or inspector violated the data-pattern invariant:
    /// `key` and `set_key` must both be empty or both be non-empty.
    #[error("invalid data pattern: key {key:?} set_key {set_key:?}")]
    InvalidDataPattern { key: String, set_key: String },

    /// A required option (e.g. `replace.old`) was omitted from the config.
    #[error("missing required options: {0}")]
    MissingRequiredOptions(String),

    /// A capsule's JSON path could not be read or written (malformed JSON,
    /// type mismatch at an intermediate segment).
    #[error("capsule error: {0}")]
    Capsule(String),

    /// A processor or inspector failed while running against a capsule.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// Standard library I/O failure (file, network).
    #[error("io error: {0}")]
    Io(String),

    /// JSON/YAML (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Regex compilation or evaluation failure.
    #[error("regex error: {0}")]
    Regex(String),

    /// Context/task cancellation, surfaced verbatim rather than classified
    /// as a processing error.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Metrics emission failure. Callers are expected to ignore these, but
    /// the variant exists so a `MetricsPort` can report one for logging.
    #[error("metrics error: {0}")]
    Metrics(String),

    /// Catch-all for unexpected internal failures.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SubstationError {
    /// Wraps an upstream error with a `processor: <name>: ` prefix, per
    /// spec's user-visible failure format.
    pub fn for_processor(name: &str, err: impl std::fmt::Display) -> Self {
        SubstationError::ProcessingFailed(format!("processor: {name}: {err}"))
    }

    /// Wraps an upstream error with a `condition: <name>: ` prefix.
    pub fn for_condition(name: &str, err: impl std::fmt::Display) -> Self {
        SubstationError::ProcessingFailed(format!("condition: {name}: {err}"))
    }

    /// `true` for errors that indicate a transient condition worth retrying
    /// (timeouts, I/O). Mirrors the teacher's `is_recoverable` convenience.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SubstationError::Io(_) | SubstationError::Cancelled(_))
    }
}

impl From<serde_json::Error> for SubstationError {
    fn from(err: serde_json::Error) -> Self {
        SubstationError::Serialization(err.to_string())
    }
}

impl From<regex::Error> for SubstationError {
    fn from(err: regex::Error) -> Self {
        SubstationError::Regex(err.to_string())
    }
}

impl From<std::io::Error> for SubstationError {
    fn from(err: std::io::Error) -> Self {
        SubstationError::Io(err.to_string())
    }
}
