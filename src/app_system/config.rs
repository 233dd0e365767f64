use std::env;
use std::path::PathBuf;

use super::error::SystemError;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON file backing the catalog. `None` keeps the catalog in memory.
    pub data_file: Option<PathBuf>,
    /// Mailbox size of every actor.
    pub channel_capacity: usize,
    /// Filter applied when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Runs before tracing is installed, so it does not log.
    pub fn from_env() -> Result<Self, SystemError> {
        // A missing .env file is normal.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SystemError> {
        let data_file = lookup("CATALOG_DATA_FILE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let channel_capacity = match lookup("CATALOG_CHANNEL_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or_else(|| {
                    SystemError::Config(format!("Invalid CATALOG_CHANNEL_CAPACITY: '{raw}' is not a positive integer"))
                })?,
            None => DEFAULT_CHANNEL_CAPACITY,
        };

        let log_filter = lookup("CATALOG_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_file,
            channel_capacity,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_reads_data_file_and_capacity() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CATALOG_DATA_FILE", "data/products.json"),
            ("CATALOG_CHANNEL_CAPACITY", "64"),
            ("CATALOG_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.data_file, Some(PathBuf::from("data/products.json")));
        assert_eq!(config.channel_capacity, 64);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = AppConfig::from_lookup(lookup(&[("CATALOG_CHANNEL_CAPACITY", "0")])).unwrap_err();
        assert!(matches!(err, SystemError::Config(_)));
    }
}
