//! Ryo objects and the property resolution engine
//!
//! An [`Object`] owns an ordered property table and an optional,
//! reference-counted prototype. Reads that miss the own table are forwarded
//! along the prototype chain; writes always land in the own table.
//!
//! # Prototype cycles
//!
//! [`Object::set_prototype`] accepts any object, including one that closes a
//! cycle. Every chain walk goes through [`Lineage`], which stops at the first
//! object it has already visited, so lookups and traversals terminate and
//! treat the cycle as the end of the chain.
//!
//! # Self-containing objects
//!
//! An object may hold itself in its own table. Equality, `Debug` and
//! `Serialize` track the objects they are inside of on the current thread:
//! a pair already being compared counts as equal, and a repeated object is
//! printed as `{...}` or rejected by the serializer.

mod accessor;
mod dispatch;

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};
use std::thread::LocalKey;

use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use tracing::{debug, trace, warn};

use crate::value::{Table, Value};

pub use accessor::{Accessor, AccessorRegistry, GetterFn, SetterFn};

const TARGET: &str = ryo_config::Component::Engine.target();

thread_local! {
    static COMPARING: RefCell<HashSet<(usize, usize)>> = RefCell::new(HashSet::new());
    static FORMATTING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
    static SERIALIZING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// Marks `key` as in progress on this thread until dropped
struct Reentry<K: Copy + Eq + Hash + 'static> {
    active: &'static LocalKey<RefCell<HashSet<K>>>,
    key: K,
}

impl<K: Copy + Eq + Hash + 'static> Reentry<K> {
    /// `None` when `key` is already in progress
    fn enter(active: &'static LocalKey<RefCell<HashSet<K>>>, key: K) -> Option<Self> {
        active
            .with(|set| set.borrow_mut().insert(key))
            .then(|| Reentry { active, key })
    }
}

impl<K: Copy + Eq + Hash + 'static> Drop for Reentry<K> {
    fn drop(&mut self) {
        self.active.with(|set| set.borrow_mut().remove(&self.key));
    }
}

pub(crate) struct ObjectData {
    table: Table,
    prototype: Option<Object>,
    accessors: AccessorRegistry,
}

/// A prototype-based object (shared handle)
///
/// Cloning the handle does not copy the object; use [`crate::dup`] for that.
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectData>>);

/// Non-owning handle, used for function receivers
#[derive(Clone)]
pub struct WeakObject(Weak<RefCell<ObjectData>>);

impl WeakObject {
    pub fn upgrade(&self) -> Option<Object> {
        self.0.upgrade().map(Object)
    }
}

impl Object {
    /// Create an empty object linked to `prototype`
    pub fn new(prototype: Option<&Object>) -> Self {
        Object(Rc::new(RefCell::new(ObjectData {
            table: Table::new(),
            prototype: prototype.cloned(),
            accessors: AccessorRegistry::default(),
        })))
    }

    /// Address of the object, stable for its lifetime
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakObject {
        WeakObject(Rc::downgrade(&self.0))
    }

    // ==================== Prototype link ====================

    pub fn prototype(&self) -> Option<Object> {
        self.0.borrow().prototype.clone()
    }

    /// Replace the prototype link (unrestricted)
    pub fn set_prototype(&self, prototype: Option<&Object>) {
        self.0.borrow_mut().prototype = prototype.cloned();
    }

    /// This object followed by its ancestors
    pub fn lineage(&self) -> Lineage {
        Lineage {
            next: Some(self.clone()),
            seen: HashSet::new(),
        }
    }

    // ==================== Read ====================

    /// Read a property, forwarding misses along the prototype chain
    ///
    /// A lazy value found at any level is resolved with `self` as context
    /// and written back into the slot it was found in. Functions are returned
    /// unevaluated.
    pub fn read(&self, name: impl AsRef<str>) -> Option<Value> {
        let name = name.as_ref();
        let value = self
            .lineage()
            .find_map(|owner| owner.resolve_own(name, self));
        trace!(target: TARGET, property = name, found = value.is_some(), "read");
        value
    }

    /// Read an own property only (lazy values resolve with `self` as context)
    pub fn read_own(&self, name: impl AsRef<str>) -> Option<Value> {
        self.resolve_own(name.as_ref(), self)
    }

    fn resolve_own(&self, name: &str, context: &Object) -> Option<Value> {
        let stored = self.0.borrow().table.get(name).cloned()?;
        match stored {
            Value::Lazy(lazy) => {
                let value = lazy.force(context);
                debug!(target: TARGET, property = name, "resolved lazy value");
                if let Some(slot) = self.0.borrow_mut().table.get_mut(name) {
                    *slot = value.clone();
                }
                Some(value)
            }
            value => Some(value),
        }
    }

    // ==================== Write ====================

    /// Assign an own property
    ///
    /// Functions are rebound to `self`. The accessor pair for `name` is
    /// synthesized on the first write only.
    pub fn write(&self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if let Value::Function(function) = &value {
            function.bind(self);
        }
        trace!(target: TARGET, property = %name, kind = value.type_name(), "write");
        let mut data = self.0.borrow_mut();
        data.accessors.ensure(&name);
        data.table.insert(name, value);
    }

    // ==================== Delete ====================

    /// Delete an own property
    ///
    /// Deleting a name that is not an own property still leaves a
    /// pass-through getter behind, so attribute reads keep routing through
    /// [`Object::read`].
    pub fn delete(&self, name: impl AsRef<str>) {
        let name = name.as_ref();
        let mut data = self.0.borrow_mut();
        if data.table.shift_remove(name).is_some() {
            trace!(target: TARGET, property = name, "delete");
        } else {
            data.accessors.ensure_getter(name);
        }
    }

    /// Delete a property from this object and every object in its chain
    pub fn delete_through_chain(&self, name: impl AsRef<str>) {
        let name = name.as_ref();
        for level in self.lineage() {
            level.delete(name);
        }
    }

    /// Remove every own property
    pub fn clear(&self) {
        self.0.borrow_mut().table.clear();
    }

    // ==================== Queries ====================

    /// Equivalent to JavaScript's `Object.hasOwn`
    pub fn has_own(&self, name: impl AsRef<str>) -> bool {
        self.0.borrow().table.contains_key(name.as_ref())
    }

    /// Equivalent to JavaScript's `in` operator
    pub fn is_in(&self, name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        self.lineage().any(|level| level.has_own(name))
    }

    /// Own property names, in table order
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().table.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().table.is_empty()
    }

    /// Snapshot of the own table (lazy values are left unresolved)
    pub fn table(&self) -> Table {
        self.0.borrow().table.clone()
    }

    /// Compare against an arbitrary value: only objects can be equal
    pub fn equals(&self, other: &Value) -> bool {
        match other {
            Value::Object(object) => self == object,
            _ => false,
        }
    }

    /// Compare the own table against a plain map
    pub fn equals_table(&self, other: &Table) -> bool {
        self.0.borrow().table == *other
    }

    /// Snapshot of the accessor registry
    pub fn accessors(&self) -> AccessorRegistry {
        self.0.borrow().accessors.clone()
    }

    /// Structural copy of this level only: same table values, given prototype
    pub(crate) fn duplicate_level(&self, prototype: Option<Object>) -> Object {
        let data = self.0.borrow();
        let table = data
            .table
            .iter()
            .map(|(name, value)| (name.clone(), value.duplicate()))
            .collect();
        Object(Rc::new(RefCell::new(ObjectData {
            table,
            prototype,
            accessors: data.accessors.clone(),
        })))
    }
}

/// Iterator over an object and its prototype chain
///
/// Stops at the end of the chain or at the first object seen twice.
pub struct Lineage {
    next: Option<Object>,
    seen: HashSet<usize>,
}

impl Iterator for Lineage {
    type Item = Object;

    fn next(&mut self) -> Option<Object> {
        let current = self.next.take()?;
        if !self.seen.insert(current.addr()) {
            warn!(
                target: TARGET,
                object = current.addr(),
                "prototype cycle detected, stopping chain walk"
            );
            return None;
        }
        self.next = current.prototype();
        Some(current)
    }
}

impl PartialEq for Object {
    /// Own tables are compared; prototypes are not
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let Some(_guard) = Reentry::enter(&COMPARING, (self.addr(), other.addr())) else {
            return true;
        };
        self.0.borrow().table == other.0.borrow().table
    }
}

impl PartialEq<Table> for Object {
    fn eq(&self, other: &Table) -> bool {
        self.equals_table(other)
    }
}

impl PartialEq<serde_json::Value> for Object {
    /// A JSON object is a plain map: compare it against the own table
    fn eq(&self, other: &serde_json::Value) -> bool {
        let Some(map) = other.as_object() else {
            return false;
        };
        let data = self.0.borrow();
        data.table.len() == map.len()
            && map
                .iter()
                .all(|(name, json)| data.table.get(name).is_some_and(|value| value == json))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = match self.0.try_borrow() {
            Ok(data) => data,
            Err(_) => return write!(f, "#<Ryo object={:#x} (in use)>", self.addr()),
        };
        write!(f, "#<Ryo object={:#x} proto=", self.addr())?;
        match &data.prototype {
            Some(prototype) => write!(f, "{:#x}", prototype.addr())?,
            None => write!(f, "nil")?,
        }
        write!(f, " table=")?;
        match Reentry::enter(&FORMATTING, self.addr()) {
            Some(_guard) => f.debug_map().entries(data.table.iter()).finish()?,
            None => write!(f, "{{...}}")?,
        }
        write!(f, ">")
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Serialize for Object {
    /// Recursive own-table export (lazy values are resolved first)
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let _guard = Reentry::enter(&SERIALIZING, self.addr())
            .ok_or_else(|| S::Error::custom("object contains itself"))?;
        let keys = self.keys();
        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            let value = self
                .read_own(&key)
                .ok_or_else(|| S::Error::custom(format!("property {key} vanished")))?;
            map.serialize_entry(&key, &value)?;
        }
        map.end()
    }
}
