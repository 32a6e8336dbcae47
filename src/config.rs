//! Global configuration
//!
//! Holds the logging levels and the engine configuration. [`init`] also
//! installs the engine part into `ryo-core`, where the accessor layer
//! reads it.
//!
//! # Example
//! ```
//! use ryo::config::{Config, LogConfig, init, config};
//! use tracing::Level;
//!
//! let cfg = Config {
//!     log: LogConfig {
//!         global: Level::DEBUG,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! init(cfg).unwrap();
//! assert_eq!(config().log.global, Level::DEBUG);
//! ```

use once_cell::sync::OnceCell;
use ryo_config::{Component, EngineConfig};
use ryo_core::{Error, Result};
use tracing::Level;

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

/// Initialize the global configuration (once, before creating objects)
///
/// Fails when the configuration was already set, or when the engine has
/// already fallen back to its defaults.
pub fn init(config: Config) -> Result<()> {
    ryo_core::config::init(config.engine.clone())?;
    GLOBAL_CONFIG
        .set(config)
        .map_err(|_| Error::ConfigAlreadyInitialized)
}

/// Get the global configuration, falling back to the defaults
pub fn config() -> &'static Config {
    GLOBAL_CONFIG.get_or_init(|| Config {
        log: LogConfig::default(),
        engine: ryo_core::config::config().clone(),
    })
}

/// Check whether the configuration has been initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}

/// Global configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Logging
    pub log: LogConfig,
    /// Object engine
    pub engine: EngineConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Global default level
    pub global: Level,
    /// Property read/write level (None uses global)
    pub engine: Option<Level>,
    /// Accessor synthesis and dispatch level
    pub accessor: Option<Level>,
    /// Builder level
    pub builder: Option<Level>,
    /// Traversal level
    pub enumerable: Option<Level>,
    /// Reflection level
    pub reflect: Option<Level>,
}

impl LogConfig {
    /// Effective level for a component
    ///
    /// Returns the component-specific level if set, the global level otherwise
    pub fn level_for(&self, component: Component) -> Level {
        let specific = match component {
            Component::Engine => self.engine,
            Component::Accessor => self.accessor,
            Component::Builder => self.builder,
            Component::Enumerable => self.enumerable,
            Component::Reflect => self.reflect,
        };
        specific.unwrap_or(self.global)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::INFO,
            engine: None,
            accessor: None,
            builder: None,
            enumerable: None,
            reflect: None,
        }
    }
}
