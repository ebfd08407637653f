//! Debug logging sink.
//!
//! Widgets emit `tracing` events unconditionally; nothing is printed unless a host
//! installs a subscriber. [`init_logging`] is the opt-in used by demos and tests:
//! it installs a `tracing-subscriber` fmt layer when `TAPE_TYPEAHEAD_DEBUG=1`.
//! Terminal hosts should set `TAPE_TYPEAHEAD_LOG_FILE`, since stderr shares the screen.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

const DEFAULT_DIRECTIVE: &str = "tape_typeahead=debug";

fn build_env_filter(config: &EnvConfig) -> EnvFilter {
    let directive = config.log_filter.as_deref().unwrap_or(DEFAULT_DIRECTIVE);
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber described by `config`.
///
/// Returns `Ok(false)` when debugging is disabled or another subscriber already owns
/// the global slot; only opening the log file can fail.
pub fn init_logging(config: &EnvConfig) -> io::Result<bool> {
    if !config.debug {
        return Ok(false);
    }

    let filter = build_env_filter(config);
    let installed = match config.log_file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .try_init()
                .is_ok()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .try_init()
            .is_ok(),
    };

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::{build_env_filter, init_logging};
    use crate::config::EnvConfig;

    fn config(debug: bool, filter: Option<&str>) -> EnvConfig {
        EnvConfig {
            debug,
            log_filter: filter.map(str::to_string),
            log_file: None,
            debounce: None,
        }
    }

    #[test]
    fn disabled_config_installs_nothing() {
        assert!(!init_logging(&config(false, None)).expect("no file to open"));
    }

    #[test]
    fn invalid_directive_falls_back_to_default() {
        let filter = build_env_filter(&config(true, Some("tape_typeahead=loud")));
        assert_eq!(filter.to_string(), "tape_typeahead=debug");
    }
}
