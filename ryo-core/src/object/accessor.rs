//! Per-object accessor registry
//!
//! The first write of a name synthesizes a getter/setter pair on that object
//! instance. Names ending in the predicate suffix get a getter only. A getter
//! whose name is a reserved protocol name remembers the protocol so that
//! dispatch can branch between a property read and the protocol behaviour.

use std::fmt;

use indexmap::IndexMap;
use ryo_config::Protocol;
use tracing::debug;

use super::Object;
use crate::config::config;
use crate::value::Value;

const TARGET: &str = ryo_config::Component::Accessor.target();

/// Zero-argument getter: reads `name` on the object
pub type GetterFn = fn(&Object, &str) -> Option<Value>;

/// One-argument setter: writes `name` on the object
pub type SetterFn = fn(&Object, &str, Value);

fn property_getter(object: &Object, name: &str) -> Option<Value> {
    object.read(name)
}

fn property_setter(object: &Object, name: &str, value: Value) {
    object.write(name, value);
}

/// A synthesized getter
#[derive(Clone, Copy)]
pub struct Accessor {
    /// Protocol the name collides with, if any
    pub protocol: Option<Protocol>,
    get: GetterFn,
}

impl Accessor {
    pub fn get(&self, object: &Object, name: &str) -> Option<Value> {
        (self.get)(object, name)
    }
}

/// Accessors synthesized on one object
#[derive(Clone, Default)]
pub struct AccessorRegistry {
    getters: IndexMap<String, Accessor>,
    setters: IndexMap<String, SetterFn>,
    syntheses: usize,
}

impl AccessorRegistry {
    pub fn getter(&self, name: &str) -> Option<Accessor> {
        self.getters.get(name).copied()
    }

    pub fn setter(&self, name: &str) -> Option<SetterFn> {
        self.setters.get(name).copied()
    }

    /// Number of times accessors were synthesized on this object
    pub fn syntheses(&self) -> usize {
        self.syntheses
    }

    /// Synthesize the accessor pair for `name` unless it already exists
    pub(crate) fn ensure(&mut self, name: &str) {
        let cfg = config();
        let mut synthesized = false;
        if !name.ends_with(cfg.predicate_suffix) && !self.setters.contains_key(name) {
            self.setters.insert(name.to_string(), property_setter);
            synthesized = true;
        }
        if !self.getters.contains_key(name) {
            self.insert_getter(name);
            synthesized = true;
        }
        if synthesized {
            self.syntheses += 1;
            debug!(target: TARGET, property = name, "synthesized accessors");
        }
    }

    /// Synthesize a pass-through getter only (left behind by `delete`)
    pub(crate) fn ensure_getter(&mut self, name: &str) {
        if self.getters.contains_key(name) {
            return;
        }
        self.insert_getter(name);
        self.syntheses += 1;
        debug!(target: TARGET, property = name, "synthesized marker getter");
    }

    fn insert_getter(&mut self, name: &str) {
        let protocol = config().protocols.lookup(name);
        self.getters.insert(
            name.to_string(),
            Accessor {
                protocol,
                get: property_getter,
            },
        );
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for AccessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorRegistry")
            .field("getters", &self.getters)
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .field("syntheses", &self.syntheses)
            .finish()
    }
}
