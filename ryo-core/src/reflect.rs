//! Reflection utilities
//!
//! Free functions over objects that do not go through attribute dispatch,
//! so they keep working when a property shadows a protocol name.

use tracing::debug;

use crate::object::Object;
use crate::value::{Table, Value};

const TARGET: &str = ryo_config::Component::Reflect.target();

pub fn prototype_of(object: &Object) -> Option<Object> {
    object.prototype()
}

/// Replace the prototype of `object`
///
/// Nothing stops a cycle from being formed; chain walks stop at the first
/// repeated object.
pub fn set_prototype_of(object: &Object, prototype: Option<&Object>) {
    debug!(
        target: TARGET,
        object = object.addr(),
        prototype = prototype.map(Object::addr),
        "set prototype"
    );
    object.set_prototype(prototype);
}

/// Ancestors of `object`, nearest first
pub fn prototype_chain_of(object: &Object) -> Vec<Object> {
    object.lineage().skip(1).collect()
}

/// Own property names, in table order
pub fn properties_of(object: &Object) -> Vec<String> {
    object.keys()
}

/// Snapshot of the own table
pub fn table_of(object: &Object) -> Table {
    object.table()
}

/// Identity comparison (as opposed to `==`, which compares tables)
pub fn same_object(a: &Object, b: &Object) -> bool {
    a.ptr_eq(b)
}

pub fn is_ryo(value: &Value) -> bool {
    value.as_object().is_some()
}

pub fn is_function(value: &Value) -> bool {
    value.is_function()
}

pub fn is_lazy(value: &Value) -> bool {
    value.is_lazy()
}

/// Something whose own pairs can be copied by [`assign`]
pub trait OwnPairs {
    fn own_pairs(&self) -> Vec<(String, Value)>;
}

impl OwnPairs for Object {
    fn own_pairs(&self) -> Vec<(String, Value)> {
        self.table().into_iter().collect()
    }
}

impl OwnPairs for Table {
    fn own_pairs(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// Copy the own pairs of each source into `target`, left to right
///
/// Sources are read before `target` is touched, so `target` may appear
/// among them. Every pair goes through `write`.
pub fn assign(target: &Object, sources: &[&dyn OwnPairs]) -> Object {
    let pairs: Vec<_> = sources.iter().flat_map(|source| source.own_pairs()).collect();
    debug!(target: TARGET, object = target.addr(), properties = pairs.len(), "assign");
    for (name, value) in pairs {
        target.write(name, value);
    }
    target.clone()
}

/// Duplicate an object together with its whole prototype chain
///
/// The result is equal to `object` at every level but shares no table
/// with it. Pending lazy values are forked so each copy resolves on its own.
pub fn dup(object: &Object) -> Object {
    let ancestors = prototype_chain_of(object);
    let prototype = ancestors
        .iter()
        .rev()
        .fold(None, |prototype, level| Some(level.duplicate_level(prototype)));
    let copy = object.duplicate_level(prototype);
    debug!(
        target: TARGET,
        source = object.addr(),
        copy = copy.addr(),
        levels = ancestors.len() + 1,
        "dup"
    );
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::create;
    use crate::lazy::Lazy;

    #[test]
    fn test_prototype_chain_of() {
        let a = create(None, [("x", 1)]);
        let b = create(Some(&a), [("y", 2)]);
        let c = create(Some(&b), [("z", 3)]);
        let chain = prototype_chain_of(&c);
        assert_eq!(chain.len(), 2);
        assert!(same_object(&chain[0], &b));
        assert!(same_object(&chain[1], &a));
        assert!(prototype_chain_of(&a).is_empty());
    }

    #[test]
    fn test_set_prototype_of_allows_cycles() {
        let a = create(None, [("x", 1)]);
        let b = create(Some(&a), [("y", 2)]);
        set_prototype_of(&a, Some(&b));
        assert_eq!(prototype_chain_of(&b).len(), 1);
        assert!(prototype_of(&a).is_some_and(|p| same_object(&p, &b)));
    }

    #[test]
    fn test_assign_left_to_right() {
        let target = create(None, [("x", 0), ("y", 0)]);
        let mut table = Table::new();
        table.insert("y".to_string(), Value::from(20));
        let source = create(None, [("y", 10), ("z", 1)]);

        let result = assign(&target, &[&source, &table]);
        assert!(same_object(&result, &target));
        assert_eq!(properties_of(&target), vec!["x", "y", "z"]);
        assert_eq!(target.read("y"), Some(Value::from(20)));
    }

    #[test]
    fn test_assign_from_itself() {
        let target = create(None, [("x", 1)]);
        assign(&target, &[&target.clone()]);
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn test_dup_copies_every_level() {
        let base = create(None, [("x", 1)]);
        let child = create(Some(&base), [("y", 2)]);
        let copy = dup(&child);

        assert_eq!(copy, child);
        assert!(!same_object(&copy, &child));
        let copy_base = prototype_of(&copy).unwrap();
        assert_eq!(copy_base, base);
        assert!(!same_object(&copy_base, &base));

        copy_base.write("x", 9);
        assert_eq!(child.read("x"), Some(Value::from(1)));
    }

    #[test]
    fn test_dup_forks_pending_lazy() {
        let object = create(None, [("v", Lazy::new(|o| Value::from(o.len() as i64)))]);
        let copy = dup(&object);
        copy.write("extra", 1);
        assert_eq!(copy.read("v"), Some(Value::from(2)));
        assert_eq!(object.read("v"), Some(Value::from(1)));
    }

    #[test]
    fn test_value_predicates() {
        let object = create(None, [("x", 1)]);
        assert!(is_ryo(&Value::Object(object)));
        assert!(!is_ryo(&Value::from(1)));
        assert!(is_lazy(&Value::from(Lazy::new(|_| Value::null()))));
        assert!(!is_function(&Value::null()));
    }
}
