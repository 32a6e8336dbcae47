//! Process-wide engine configuration
//!
//! The accessor layer needs the reserved protocol names on every write, so
//! the engine configuration lives in a global cell. It can be installed once
//! with [`init`]; until then [`config`] hands out the defaults.

use once_cell::sync::OnceCell;
use ryo_config::EngineConfig;

use crate::error::{Error, Result};

static ENGINE_CONFIG: OnceCell<EngineConfig> = OnceCell::new();

/// Install the engine configuration (at most once per process)
pub fn init(config: EngineConfig) -> Result<()> {
    ENGINE_CONFIG
        .set(config)
        .map_err(|_| Error::ConfigAlreadyInitialized)
}

/// Get the engine configuration, falling back to the defaults
pub fn config() -> &'static EngineConfig {
    ENGINE_CONFIG.get_or_init(EngineConfig::default)
}

/// Check whether a configuration has been installed or defaulted
pub fn is_initialized() -> bool {
    ENGINE_CONFIG.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_then_rejects_init() {
        assert_eq!(config().predicate_suffix, '?');
        assert!(is_initialized());
        assert_eq!(
            init(EngineConfig::default()),
            Err(Error::ConfigAlreadyInitialized)
        );
    }
}
