//! Prototype-chain-aware traversal
//!
//! Every operation walks an object and then its prototypes. `depth` bounds
//! how many ancestors are visited: `Some(0)` covers the object only,
//! `Some(1)` the object and its prototype, and so on. `None` falls back to
//! the configured default, which walks the whole chain unless set;
//! [`UNLIMITED`] always walks the whole chain.
//!
//! [`each`] reports pairs the way [`Object::read`] sees them: a name already
//! seen at a shallower level is skipped. [`each_pair`] reports every level
//! with its owner and is what the in-place forms and queries build on.
//!
//! The copying forms (`map`, `select`, `reject`) work on [`dup`] of the
//! object; the `*_in_place` forms write back to the owner of each pair.

use std::collections::HashSet;
use std::iter::Take;

use tracing::debug;

use crate::config::config;
use crate::object::{Lineage, Object};
use crate::reflect::dup;
use crate::value::Value;

const TARGET: &str = ryo_config::Component::Enumerable.target();

/// Depth that walks the whole chain regardless of the configured default
pub const UNLIMITED: Option<usize> = Some(usize::MAX);

pub(crate) fn levels(object: &Object, depth: Option<usize>) -> Take<Lineage> {
    let depth = depth.or(config().traversal.default_depth);
    object
        .lineage()
        .take(depth.map_or(usize::MAX, |d| d.saturating_add(1)))
}

/// Iterator over `(owner, name, value)` triples
///
/// Keys are snapshotted per level when the level is entered, so the
/// caller may write or delete on the owner while iterating.
pub struct Pairs {
    levels: Take<Lineage>,
    current: Option<(Object, std::vec::IntoIter<String>)>,
}

impl Iterator for Pairs {
    type Item = (Object, String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((owner, keys)) = &mut self.current {
                for name in keys.by_ref() {
                    if let Some(value) = owner.read_own(&name) {
                        return Some((owner.clone(), name, value));
                    }
                }
            }
            let owner = self.levels.next()?;
            let keys = owner.keys().into_iter();
            self.current = Some((owner, keys));
        }
    }
}

/// Walk the object and its ancestors, yielding the owner of each pair
pub fn each_pair(object: &Object, depth: Option<usize>) -> Pairs {
    Pairs {
        levels: levels(object, depth),
        current: None,
    }
}

/// `(name, value)` pairs with shadowed names skipped
pub fn each(object: &Object, depth: Option<usize>) -> impl Iterator<Item = (String, Value)> {
    let mut seen = HashSet::new();
    each_pair(object, depth).filter_map(move |(_, name, value)| {
        seen.insert(name.clone()).then_some((name, value))
    })
}

// ==================== Transformations ====================

/// Map every value of a copy of the object
pub fn map<F>(object: &Object, depth: Option<usize>, f: F) -> Object
where
    F: FnMut(&str, &Value) -> Value,
{
    let copy = dup(object);
    map_in_place(&copy, depth, f);
    copy
}

/// Replace every value with `f(name, value)`, on the level that owns it
pub fn map_in_place<F>(object: &Object, depth: Option<usize>, mut f: F) -> &Object
where
    F: FnMut(&str, &Value) -> Value,
{
    for (owner, name, value) in each_pair(object, depth) {
        let mapped = f(&name, &value);
        owner.write(name, mapped);
    }
    debug!(target: TARGET, object = object.addr(), "map");
    object
}

/// Keep pairs matching `predicate`, on a copy of the object
pub fn select<F>(object: &Object, depth: Option<usize>, predicate: F) -> Object
where
    F: FnMut(&str, &Value) -> bool,
{
    let copy = dup(object);
    select_in_place(&copy, depth, predicate);
    copy
}

/// Delete every pair not matching `predicate` from its owner
pub fn select_in_place<F>(object: &Object, depth: Option<usize>, mut predicate: F) -> &Object
where
    F: FnMut(&str, &Value) -> bool,
{
    retain(object, depth, |name, value| predicate(name, value));
    object
}

/// Drop pairs matching `predicate`, on a copy of the object
pub fn reject<F>(object: &Object, depth: Option<usize>, predicate: F) -> Object
where
    F: FnMut(&str, &Value) -> bool,
{
    let copy = dup(object);
    reject_in_place(&copy, depth, predicate);
    copy
}

/// Delete every pair matching `predicate` from its owner
pub fn reject_in_place<F>(object: &Object, depth: Option<usize>, mut predicate: F) -> &Object
where
    F: FnMut(&str, &Value) -> bool,
{
    retain(object, depth, |name, value| !predicate(name, value));
    object
}

fn retain(object: &Object, depth: Option<usize>, mut keep: impl FnMut(&str, &Value) -> bool) {
    let mut removed = 0usize;
    for (owner, name, value) in each_pair(object, depth) {
        if !keep(&name, &value) {
            owner.delete(&name);
            removed += 1;
        }
    }
    debug!(target: TARGET, object = object.addr(), removed, "filter");
}

// ==================== Queries ====================

/// True as soon as one pair matches
pub fn any<F>(object: &Object, depth: Option<usize>, mut predicate: F) -> bool
where
    F: FnMut(&str, &Value) -> bool,
{
    each_pair(object, depth).any(|(_, name, value)| predicate(&name, &value))
}

/// False as soon as one pair does not match
pub fn all<F>(object: &Object, depth: Option<usize>, mut predicate: F) -> bool
where
    F: FnMut(&str, &Value) -> bool,
{
    each_pair(object, depth).all(|(_, name, value)| predicate(&name, &value))
}

/// The owner of the first pair matching `predicate`
pub fn find<F>(object: &Object, depth: Option<usize>, mut predicate: F) -> Option<Object>
where
    F: FnMut(&str, &Value) -> bool,
{
    each_pair(object, depth)
        .find(|(_, name, value)| predicate(name, value))
        .map(|(owner, _, _)| owner)
}
