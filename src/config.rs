//! Configuration surface for the routing decision engine.
//!
//! The crate does no file I/O of its own: integrators build a
//! [`RouterConfig`] in code or deserialize one with serde from whatever
//! format they already use, then hand it to
//! [`HostResolver::new`](crate::resolver::HostResolver::new). All
//! sections support `#[serde(default)]` so a partial document works.

use crate::error::{Result, RouterError};
use crate::index::HostIndex;
use serde::{Deserialize, Serialize};

/// Default proxy directive handed back for hosts found in the index.
pub const DEFAULT_PROXY_DIRECTIVE: &str = "SOCKS5 127.0.0.1:1080; SOCKS 127.0.0.1:1080; DIRECT;";

/// Decision cache configuration section.
///
/// Caching and touch-on-get are independent switches: a resolver can run
/// without any cache, with a plain insertion-order cache, or with
/// access-order refresh on reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether decisions are cached at all.
    pub enabled: bool,

    /// Maximum number of cached decisions.
    pub capacity: usize,

    /// Refresh an entry's recency on successful reads.
    pub touch_on_get: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 10,
            touch_on_get: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable pretty format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for structured logging.
    Json,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    pub level: String,

    /// Output destination: stdout, stderr, or file path.
    pub output: String,

    /// Log format.
    pub format: LogFormat,

    /// Include target (module path) in logs.
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: "stderr".to_string(),
            format: LogFormat::Pretty,
            include_target: true,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    /// Hosts routed through the proxy. Order and duplicates do not
    /// matter here; [`build_host_index`](Self::build_host_index) sorts
    /// and de-duplicates before lookup.
    pub hosts: Vec<String>,

    /// Proxy directive returned for hosts present in the index.
    pub proxy: String,

    /// Decision cache settings.
    pub cache: CacheConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            proxy: DEFAULT_PROXY_DIRECTIVE.to_string(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.proxy.trim().is_empty() {
            return Err(RouterError::config_validation(
                "Proxy directive cannot be empty",
            ));
        }

        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(RouterError::InvalidCapacity {
                capacity: self.cache.capacity,
            });
        }

        if self.hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(RouterError::config_validation("Host entry cannot be empty"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(RouterError::config_validation(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }

    /// Builds the sorted host index for O(log n) lookups.
    pub fn build_host_index(&self) -> HostIndex {
        HostIndex::from_unsorted(self.hosts.clone())
    }
}
