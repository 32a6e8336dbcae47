//! Ryo - prototype-based objects for Rust
//!
//! Objects own an ordered property table and may delegate unknown reads to
//! a prototype object. Assigning a property synthesizes attribute-style
//! accessors for it; values can be nested objects, sequences, lazily
//! computed values, or functions bound to the object they were stored in.
//!
//! # Architecture
//!
//! ```text
//! ryo-config/  - Pure configuration data (protocol names, traversal defaults)
//! ryo-core/    - The engine (no IO)
//! src/         - Facade: re-exports, global config, logging setup
//! ```
//!
//! # Quick Start
//!
//! ```
//! use ryo::{create, Value};
//!
//! let point = create(None, [("x", 0), ("y", 0)]);
//! let point3d = create(Some(&point), [("z", 0)]);
//! point3d.set_attr("x", 5).unwrap();
//!
//! assert_eq!(point3d.get_attr("x").unwrap(), Some(Value::from(5)));
//! assert_eq!(point.get_attr("x").unwrap(), Some(Value::from(0)));
//! ```

pub mod config;
pub mod logger;

pub use config::{Config, LogConfig};
pub use logger::{init_logger, LogFormat};
pub use ryo_config::{Component, EngineConfig, Protocol, ProtocolConfig, TraversalConfig};
pub use ryo_core::{
    assign, create, dup, fn_, from, function, is_function, is_lazy, is_ryo, lazy, memo,
    properties_of, prototype_chain_of, prototype_of, same_object, set_prototype_of, table_of,
    Arity, Block, Buildable, Call, Error, Function, Lazy, Object, OwnPairs, Result, Scalar, Table,
    Value,
};
pub use ryo_core::{enumerable, keywords, reflect};

/// Initialize configuration only (logging is left alone)
///
/// # Example
/// ```ignore
/// use ryo::{init, Config};
///
/// init(Config::default()).unwrap();
/// ```
pub fn init(config: Config) -> Result<()> {
    config::init(config)
}

/// Initialize configuration and logging
///
/// # Example
/// ```ignore
/// use ryo::{init_with_logger, Config, LogFormat};
///
/// init_with_logger(Config::default(), LogFormat::Compact).unwrap();
/// ```
pub fn init_with_logger(config: Config, format: LogFormat) -> Result<()> {
    config::init(config)?;
    logger::init_with_format(format);
    Ok(())
}

/// Build objects from parsed JSON (loader output)
///
/// # Example
/// ```
/// let value = ryo::from_json(&serde_json::json!({"point": {"x": 1}})).unwrap();
/// let object = value.as_object().unwrap();
/// assert!(object.read("point").is_some());
/// ```
pub fn from_json(json: &serde_json::Value) -> Result<Value> {
    from(json, None)
}
