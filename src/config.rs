//! Environment configuration.

use std::env;
use std::time::Duration;

/// Quiet period used when neither the options nor the environment set one.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub debug: bool,
    pub log_filter: Option<String>,
    pub log_file: Option<String>,
    pub debounce: Option<Duration>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("TAPE_TYPEAHEAD_DEBUG"),
            log_filter: env_string_opt("TAPE_TYPEAHEAD_LOG"),
            log_file: env_string_opt("TAPE_TYPEAHEAD_LOG_FILE"),
            debounce: env_string_opt("TAPE_TYPEAHEAD_DEBOUNCE_MS")
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_millis),
        }
    }

    pub fn debounce_or_default(&self) -> Duration {
        self.debounce.unwrap_or(DEFAULT_DEBOUNCE)
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
