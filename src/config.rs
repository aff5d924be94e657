//! Runtime configuration, read from the environment of the host process.
//!
//! A plugin has no command line and no config file of its own, so the only knobs exposed here
//! control diagnostics. Everything musical is a host-automatable parameter instead.

use std::path::PathBuf;

/// Name of the variable holding a `tracing` filter directive, e.g. `trisynth=debug`. Logging is
/// disabled entirely when it is unset.
pub const LOG_FILTER_VAR: &str = "TRISYNTH_LOG";
/// Name of the variable overriding the path of the log file.
pub const LOG_FILE_VAR: &str = "TRISYNTH_LOG_FILE";

const DEFAULT_LOG_FILE_NAME: &str = "trisynth.log";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub log_filter: Option<String>,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let non_empty = |key| lookup(key).filter(|value: &String| !value.trim().is_empty());

        Self {
            log_filter: non_empty(LOG_FILTER_VAR),
            log_file: non_empty(LOG_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_is_off_without_a_filter() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.log_filter, None);
        assert_eq!(
            config.log_file,
            std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME)
        );
    }

    #[test]
    fn reads_both_variables() {
        let config = Config::from_lookup(|key| match key {
            LOG_FILTER_VAR => Some("trisynth=debug".to_string()),
            LOG_FILE_VAR => Some("/tmp/custom.log".to_string()),
            _ => None,
        });
        assert_eq!(config.log_filter.as_deref(), Some("trisynth=debug"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/custom.log"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = Config::from_lookup(|key| match key {
            LOG_FILTER_VAR => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.log_filter, None);
    }
}
