// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keytip CLI entrypoint.
//!
//! Runs the terminal demo. `--settings` takes the same JSON object a host would inject;
//! `--log` sends tracing output to a file since the terminal belongs to the UI.

use std::error::Error;
use std::path::PathBuf;

use keytip::config::NavigatorConfig;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--settings <json>] [--log <file>]\n\n--settings takes a JSON object, e.g. '{{\"start-key\": \"f\", \"max-prefix\": 3}}'.\n--log writes diagnostics to <file>; the filter is read from {}.",
        keytip::logging::LOG_ENV
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    settings: Option<String>,
    log_file: Option<PathBuf>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                if options.settings.is_some() {
                    return Err(());
                }
                options.settings = Some(args.next().ok_or(())?);
            }
            "--log" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(PathBuf::from(args.next().ok_or(())?));
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "keytip".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Some(path) = &options.log_file {
            keytip::logging::init_file_logging(path)?;
        }

        let config = match &options.settings {
            Some(raw) => NavigatorConfig::from_json_str(raw)?,
            None => NavigatorConfig::default(),
        };
        tracing::info!(target: keytip::logging::targets::TUI, ?config, "starting demo");

        keytip::tui::run(config)
    })();

    if let Err(err) = result {
        eprintln!("keytip: {err}");
        std::process::exit(1);
    }
}
