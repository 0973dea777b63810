// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is up to the host. The
//! bundled terminal host owns stdout, so [`init_file_logging`] sends events to a file instead.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `keytip::session=debug`.
pub const LOG_ENV: &str = "KEYTIP_LOG";

/// Target names for log filtering.
pub mod targets {
    pub const ALLOC: &str = "keytip::alloc";
    pub const SESSION: &str = "keytip::session";
    pub const RETRY: &str = "keytip::retry";
    pub const TUI: &str = "keytip::tui";
}

pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let log_file = File::create(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}
