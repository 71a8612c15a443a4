// Client configuration
// Defaults plus SNIPDESK_* environment overrides

use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::services::MediaQuery;
use crate::storage::{get_default_db_path, StorageError};

pub const DEFAULT_HOME_ROUTE: &str = "/";
pub const DEFAULT_LARGE_SCREEN_MIN_WIDTH: u32 = 768;
pub const DEFAULT_LOG_FILTER: &str = "snipdesk=info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
    #[error("Could not resolve default database path: {0}")]
    DefaultPath(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// SQLite file backing tokens, the offline mirror and the local backend
    pub db_path: PathBuf,
    /// Route opened after a successful sign in
    pub home_route: String,
    /// Viewport width from which the dashboard uses the large layout
    pub large_screen_min_width: u32,
    /// `EnvFilter` directive string
    pub log_filter: String,
}

impl ClientConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            home_route: DEFAULT_HOME_ROUTE.to_string(),
            large_screen_min_width: DEFAULT_LARGE_SCREEN_MIN_WIDTH,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// Defaults with the database in the platform data directory, then environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("SNIPDESK_DB_PATH") {
            Some(path) => Self::new(path),
            None => Self::new(get_default_db_path()?),
        };

        if let Some(route) = lookup("SNIPDESK_HOME_ROUTE") {
            if !route.starts_with('/') {
                return Err(ConfigError::InvalidValue(format!(
                    "Home route must start with '/': {route}"
                )));
            }
            config.home_route = route;
        }
        if let Some(width) = lookup("SNIPDESK_BREAKPOINT_PX") {
            config.large_screen_min_width = width.trim().parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid breakpoint width: {e}"))
            })?;
        }
        if let Some(filter) = lookup("SNIPDESK_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    pub fn large_screen_query(&self) -> MediaQuery {
        MediaQuery::MinWidth(self.large_screen_min_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SNIPDESK_DB_PATH", "/tmp/snipdesk-test.db"),
            ("SNIPDESK_HOME_ROUTE", "/snippets"),
            ("SNIPDESK_BREAKPOINT_PX", " 1024 "),
            ("SNIPDESK_LOG", "snipdesk=debug"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/snipdesk-test.db"));
        assert_eq!(config.home_route, "/snippets");
        assert_eq!(config.large_screen_query(), MediaQuery::MinWidth(1024));
        assert_eq!(config.log_filter, "snipdesk=debug");
    }

    #[test]
    fn test_defaults_with_explicit_path() {
        let config = ClientConfig::from_lookup(lookup(&[("SNIPDESK_DB_PATH", "a.db")])).unwrap();
        assert_eq!(config, ClientConfig::new("a.db"));
        assert_eq!(config.home_route, DEFAULT_HOME_ROUTE);
        assert_eq!(config.large_screen_min_width, DEFAULT_LARGE_SCREEN_MIN_WIDTH);
    }

    #[test]
    fn test_malformed_values() {
        let width = ClientConfig::from_lookup(lookup(&[
            ("SNIPDESK_DB_PATH", "a.db"),
            ("SNIPDESK_BREAKPOINT_PX", "wide"),
        ]));
        assert!(matches!(width, Err(ConfigError::InvalidValue(_))));

        let route = ClientConfig::from_lookup(lookup(&[
            ("SNIPDESK_DB_PATH", "a.db"),
            ("SNIPDESK_HOME_ROUTE", "dashboard"),
        ]));
        assert!(matches!(route, Err(ConfigError::InvalidValue(_))));
    }
}
