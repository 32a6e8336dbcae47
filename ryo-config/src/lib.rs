//! Ryo Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Ryo crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Host protocol behaviour that a property name may collide with
///
/// A property stored under one of these names still reads like any other
/// property when accessed without arguments, but keeps the protocol
/// behaviour available when invoked with arguments or a trailing block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// Object printing
    Inspect,
    /// Value equality
    Eq,
    /// Attribute-dispatch fallback
    MethodMissing,
    /// "Does this object respond to name?"
    RespondTo,
    /// Yield self to a block, return self
    Tap,
}

/// Reserved protocol names supplied by the host integration layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Property name -> protocol it collides with
    pub names: BTreeMap<String, Protocol>,
}

/// Configuration for enumerable traversal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Ancestor bound used when a traversal is not given one
    /// (`None` walks the entire prototype chain)
    pub default_depth: Option<usize>,
}

/// Configuration for the object engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reserved protocol names
    pub protocols: ProtocolConfig,
    /// Suffix marking boolean-style query names (no setter is synthesized)
    pub predicate_suffix: char,
    /// Traversal defaults
    pub traversal: TraversalConfig,
}

/// Engine component, used for log targets and per-component log levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Engine,
    Accessor,
    Builder,
    Enumerable,
    Reflect,
}

impl ProtocolConfig {
    /// Look up the protocol a property name collides with
    pub fn lookup(&self, name: &str) -> Option<Protocol> {
        self.names.get(name).copied()
    }
}

impl Component {
    /// All components, in pipeline order
    pub const ALL: [Component; 5] = [
        Component::Engine,
        Component::Accessor,
        Component::Builder,
        Component::Enumerable,
        Component::Reflect,
    ];

    /// Get the string name of the component
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Engine => "engine",
            Component::Accessor => "accessor",
            Component::Builder => "builder",
            Component::Enumerable => "enumerable",
            Component::Reflect => "reflect",
        }
    }

    /// Get the log target name for this component
    pub const fn target(self) -> &'static str {
        match self {
            Component::Engine => "ryo::engine",
            Component::Accessor => "ryo::accessor",
            Component::Builder => "ryo::builder",
            Component::Enumerable => "ryo::enumerable",
            Component::Reflect => "ryo::reflect",
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        let names = [
            ("inspect", Protocol::Inspect),
            ("==", Protocol::Eq),
            ("method_missing", Protocol::MethodMissing),
            ("respond_to?", Protocol::RespondTo),
            ("tap", Protocol::Tap),
        ]
        .into_iter()
        .map(|(name, protocol)| (name.to_string(), protocol))
        .collect();
        Self { names }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            protocols: ProtocolConfig::default(),
            predicate_suffix: '?',
            traversal: TraversalConfig::default(),
        }
    }
}
