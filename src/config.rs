use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "mergington_high";
pub const DEFAULT_SELECTION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Where the external document database lives and how long the startup
/// probe may wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    pub server_selection_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            server_selection_timeout: DEFAULT_SELECTION_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Read `MERGINGTON_DB_URI`, `MERGINGTON_DB_NAME` and
    /// `MERGINGTON_DB_TIMEOUT_MS`, falling back to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(uri) = lookup("MERGINGTON_DB_URI") {
            config.uri = uri;
        }
        if let Some(name) = lookup("MERGINGTON_DB_NAME") {
            if name.is_empty() {
                return Err(Error::InvalidConfig("MERGINGTON_DB_NAME is empty".into()));
            }
            config.database = name;
        }
        if let Some(ms) = lookup("MERGINGTON_DB_TIMEOUT_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                Error::InvalidConfig(format!("MERGINGTON_DB_TIMEOUT_MS is not a number: {ms}"))
            })?;
            config.server_selection_timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }
}
