// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging
//!
//! Installs a `tracing-subscriber` global subscriber: human-readable output
//! on a terminal, JSON lines otherwise (piped into a log collector), with
//! the level controlled by `RUST_LOG` or the CLI's `--verbose` flag.

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global `tracing` subscriber. Safe to call once per
/// process; a second call is a no-op (the error from `try_init` is
/// swallowed).
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });

    let subscriber = fmt().with_env_filter(filter).with_target(true);

    if atty_stdout() {
        let _ = subscriber.finish().try_init();
    } else {
        let _ = subscriber.json().finish().try_init();
    }
}

fn atty_stdout() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
