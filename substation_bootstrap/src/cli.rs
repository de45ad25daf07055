// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. clap parsing                    │  Parse CLI arguments
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. SecureArgParser::validate_*      │  Path/value validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use thiserror::Error;

/// Substation — run declarative, capsule-based data-processing pipelines.
#[derive(Debug, Parser)]
#[command(name = "substation", version, about)]
pub struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a global configuration file (JSON or YAML).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bounded channel depth between transform stages.
    #[arg(long, default_value_t = 64, global = true)]
    pub channel_depth: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a pipeline document against an input, writing capsules to an
    /// output sink.
    Run {
        /// Path to the pipeline document (JSON or YAML).
        pipeline: PathBuf,
        /// Input file; newline-delimited JSON or raw records, one per line.
        #[arg(long)]
        input: PathBuf,
        /// Output file; one capsule payload per line.
        #[arg(long)]
        output: PathBuf,
        /// Grace period, in seconds, for in-flight capsules to drain on
        /// SIGINT/SIGTERM before the pipeline is forced to stop.
        #[arg(long, default_value_t = 5)]
        grace_period_secs: u64,
    },
    /// Validate a pipeline document without running it.
    Validate {
        /// Path to the pipeline document (JSON or YAML).
        pipeline: PathBuf,
    },
}

/// Parses raw CLI arguments with clap. Separated from validation so unit
/// tests can exercise the two independently.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Validated CLI configuration: every path confirmed to exist (where it
/// must) and every numeric value range-checked.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub channel_depth: usize,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Run {
        pipeline: PathBuf,
        input: PathBuf,
        output: PathBuf,
        grace_period_secs: u64,
    },
    Validate {
        pipeline: PathBuf,
    },
}

/// Errors produced while validating CLI arguments.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),
    #[error("path contains a disallowed pattern: {0}")]
    UnsafePath(PathBuf),
    #[error("invalid value for --{arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Validates CLI-supplied paths against path-traversal and null-byte
/// injection patterns, the way a production CLI bootstrap layer would
/// before ever touching the filesystem with user input.
pub struct SecureArgParser;

impl SecureArgParser {
    /// Validates an arbitrary argument string (not necessarily a path that
    /// must already exist) for dangerous patterns.
    pub fn validate_argument(value: &str) -> Result<(), ParseError> {
        if value.contains('\0') || value.contains("..") {
            return Err(ParseError::UnsafePath(PathBuf::from(value)));
        }
        Ok(())
    }

    /// Validates a path that must already exist on disk, returning its
    /// canonical form.
    pub fn validate_path(value: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(value)?;
        let path = Path::new(value);
        if !path.exists() {
            return Err(ParseError::PathNotFound(path.to_path_buf()));
        }
        path.canonicalize().map_err(|_| ParseError::PathNotFound(path.to_path_buf()))
    }
}

/// Parses and validates CLI arguments in one call: the composition root's
/// entry point.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    validate_cli(parse_cli())
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = match &cli.config {
        Some(path) => Some(SecureArgParser::validate_path(&path.to_string_lossy())?),
        None => None,
    };

    if cli.channel_depth == 0 {
        return Err(ParseError::InvalidValue {
            arg: "channel-depth".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    let command = match cli.command {
        Commands::Run {
            pipeline,
            input,
            output,
            grace_period_secs,
        } => {
            let pipeline = SecureArgParser::validate_path(&pipeline.to_string_lossy())?;
            let input = SecureArgParser::validate_path(&input.to_string_lossy())?;
            SecureArgParser::validate_argument(&output.to_string_lossy())?;
            ValidatedCommand::Run {
                pipeline,
                input,
                output,
                grace_period_secs,
            }
        }
        Commands::Validate { pipeline } => {
            let pipeline = SecureArgParser::validate_path(&pipeline.to_string_lossy())?;
            ValidatedCommand::Validate { pipeline }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config,
        channel_depth: cli.channel_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_argument_rejects_path_traversal() {
        assert!(SecureArgParser::validate_argument("../etc/passwd").is_err());
    }

    #[test]
    fn validate_argument_rejects_null_byte() {
        assert!(SecureArgParser::validate_argument("foo\0bar").is_err());
    }

    #[test]
    fn validate_argument_accepts_plain_path() {
        assert!(SecureArgParser::validate_argument("pipelines/main.json").is_ok());
    }

    #[test]
    fn validate_path_rejects_missing_file() {
        assert!(matches!(
            SecureArgParser::validate_path("/no/such/file/anywhere.json"),
            Err(ParseError::PathNotFound(_))
        ));
    }

    #[test]
    fn channel_depth_zero_is_rejected() {
        let cli = Cli {
            verbose: false,
            config: None,
            channel_depth: 0,
            command: Commands::Validate {
                pipeline: PathBuf::from(file!()),
            },
        };
        assert!(matches!(
            validate_cli(cli),
            Err(ParseError::InvalidValue { arg, .. }) if arg == "channel-depth"
        ));
    }

    #[test]
    fn validate_command_resolves_existing_pipeline_path() {
        let cli = Cli {
            verbose: true,
            config: None,
            channel_depth: 64,
            command: Commands::Validate {
                pipeline: PathBuf::from(file!()),
            },
        };
        let validated = validate_cli(cli).unwrap();
        assert!(validated.verbose);
        match validated.command {
            ValidatedCommand::Validate { pipeline } => assert!(pipeline.exists()),
            _ => panic!("expected Validate command"),
        }
    }
}
