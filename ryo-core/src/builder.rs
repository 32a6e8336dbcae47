//! Object construction
//!
//! [`create`] builds a single object from key/value pairs. [`from`] walks
//! nested map/sequence data (a parsed JSON document, a table of values, an
//! existing object) and turns every map it finds into an object.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::object::Object;
use crate::value::{Scalar, Value};

const TARGET: &str = ryo_config::Component::Builder.target();

/// How a source looks to the builder
pub enum Shape<'a> {
    /// Already an object
    Ryo(Object),
    /// Supports pair iteration
    Map(Vec<(String, &'a dyn Buildable)>),
    /// Supports element iteration
    Seq(Vec<&'a dyn Buildable>),
    /// Anything else; kept as-is when nested
    Leaf(Value),
}

/// A source [`from`] can walk
pub trait Buildable {
    fn shape(&self) -> Shape<'_>;

    /// Type name reported when the source cannot be iterated
    fn describe(&self) -> &'static str;
}

/// Create an object linked to `prototype`, writing each pair in order
pub fn create<K, V>(prototype: Option<&Object>, properties: impl IntoIterator<Item = (K, V)>) -> Object
where
    K: Into<String>,
    V: Into<Value>,
{
    let object = Object::new(prototype);
    for (name, value) in properties {
        object.write(name, value);
    }
    object
}

/// Recursively build objects from nested map/sequence data
///
/// * an object source is copied (own table only) and keeps its prototype
///   unless `prototype` overrides it
/// * a map becomes an object linked to `prototype`
/// * a sequence becomes a [`Value::Sequence`] of converted elements
///
/// Nested maps always become fresh objects with no prototype. Nested
/// objects are kept as they are.
pub fn from<S: Buildable + ?Sized>(source: &S, prototype: Option<&Object>) -> Result<Value> {
    match source.shape() {
        Shape::Ryo(object) => {
            let prototype = prototype.cloned().or_else(|| object.prototype());
            debug!(target: TARGET, source = object.addr(), "copying object");
            let table = object.table();
            let pairs = table.iter().map(|(name, value)| (name.clone(), convert(value)));
            Ok(Value::Object(create(prototype.as_ref(), pairs)))
        }
        Shape::Map(pairs) => {
            debug!(target: TARGET, properties = pairs.len(), "building object");
            Ok(Value::Object(build_map(pairs, prototype)))
        }
        Shape::Seq(items) => {
            debug!(target: TARGET, elements = items.len(), "building sequence");
            Ok(Value::Sequence(items.into_iter().map(convert).collect()))
        }
        Shape::Leaf(_) => Err(Error::NotIterable {
            found: source.describe(),
        }),
    }
}

fn build_map(pairs: Vec<(String, &dyn Buildable)>, prototype: Option<&Object>) -> Object {
    create(
        prototype,
        pairs.into_iter().map(|(name, value)| (name, convert(value))),
    )
}

fn convert(value: &dyn Buildable) -> Value {
    match value.shape() {
        Shape::Ryo(object) => Value::Object(object),
        Shape::Map(pairs) => Value::Object(build_map(pairs, None)),
        Shape::Seq(items) => Value::Sequence(items.into_iter().map(convert).collect()),
        Shape::Leaf(value) => value,
    }
}

// ==================== Sources ====================

impl Buildable for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Object(object) => Shape::Ryo(object.clone()),
            Value::Sequence(items) => Shape::Seq(items.iter().map(|v| v as &dyn Buildable).collect()),
            other => Shape::Leaf(other.duplicate()),
        }
    }

    fn describe(&self) -> &'static str {
        self.type_name()
    }
}

impl Buildable for Object {
    fn shape(&self) -> Shape<'_> {
        Shape::Ryo(self.clone())
    }

    fn describe(&self) -> &'static str {
        "ryo object"
    }
}

impl<T: Buildable> Buildable for IndexMap<String, T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(name, value)| (name.clone(), value as &dyn Buildable))
                .collect(),
        )
    }

    fn describe(&self) -> &'static str {
        "map"
    }
}

impl<T: Buildable> Buildable for BTreeMap<String, T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(name, value)| (name.clone(), value as &dyn Buildable))
                .collect(),
        )
    }

    fn describe(&self) -> &'static str {
        "map"
    }
}

impl<T: Buildable> Buildable for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|v| v as &dyn Buildable).collect())
    }

    fn describe(&self) -> &'static str {
        "sequence"
    }
}

/// Loader output
impl Buildable for serde_json::Value {
    fn shape(&self) -> Shape<'_> {
        use serde_json::Value as Json;

        match self {
            Json::Object(map) => Shape::Map(
                map.iter()
                    .map(|(name, value)| (name.clone(), value as &dyn Buildable))
                    .collect(),
            ),
            Json::Array(items) => Shape::Seq(items.iter().map(|v| v as &dyn Buildable).collect()),
            Json::Null => Shape::Leaf(Value::null()),
            Json::Bool(b) => Shape::Leaf(Value::from(*b)),
            Json::Number(n) => Shape::Leaf(match n.as_i64() {
                Some(int) => Value::from(int),
                None => Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            }),
            Json::String(s) => Shape::Leaf(Value::from(s.as_str())),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Table;
    use serde_json::json;

    #[test]
    fn test_create_writes_in_order() {
        let object = create(None, [("b", 1), ("a", 2)]);
        assert_eq!(object.keys(), vec!["b", "a"]);
        assert_eq!(object.accessors().syntheses(), 2);
    }

    #[test]
    fn test_from_json_nested() {
        let source = json!({"point": {"x": 1, "y": 2}, "tags": ["a", {"k": true}]});
        let value = from(&source, None).unwrap();
        let object = value.as_object().unwrap();

        let point = object.read("point").unwrap();
        let point = point.as_object().unwrap();
        assert_eq!(point.read("x"), Some(Value::from(1)));
        assert!(point.prototype().is_none());

        let tags = object.read("tags").unwrap();
        let tags = tags.as_sequence().unwrap();
        assert_eq!(tags[0], Value::from("a"));
        assert!(tags[1].as_object().is_some());
    }

    #[test]
    fn test_nested_maps_do_not_inherit_prototype() {
        let proto = create(None, [("shared", 1)]);
        let value = from(&json!({"child": {"x": 1}}), Some(&proto)).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.prototype().is_some_and(|p| p.ptr_eq(&proto)));
        let child = object.read("child").unwrap();
        assert!(child.as_object().unwrap().prototype().is_none());
    }

    #[test]
    fn test_from_sequence_of_maps() {
        let value = from(&json!([{"x": 0}, "foo", {"point": {"x": 0}}]), None).unwrap();
        let items = value.as_sequence().unwrap();
        assert!(items[0].as_object().is_some());
        assert_eq!(items[1], Value::from("foo"));
        let point = items[2].as_object().unwrap().read("point").unwrap();
        assert_eq!(point.as_object().unwrap().read("x"), Some(Value::from(0)));
    }

    #[test]
    fn test_from_object_copies_table_and_prototype() {
        let proto = create(None, [("z", 0)]);
        let source = create(Some(&proto), [("x", 1)]);
        let copy = from(&source, None).unwrap();
        let copy = copy.as_object().unwrap();

        assert_eq!(*copy, source);
        assert!(!copy.ptr_eq(&source));
        assert!(copy.prototype().is_some_and(|p| p.ptr_eq(&proto)));

        copy.write("x", 2);
        assert_eq!(source.read("x"), Some(Value::from(1)));
    }

    #[test]
    fn test_from_table() {
        let mut table = Table::new();
        table.insert("x".to_string(), Value::from(1));
        let value = from(&table, None).unwrap();
        assert_eq!(*value.as_object().unwrap(), table);
    }

    #[test]
    fn test_from_leaf_is_type_error() {
        assert_eq!(
            from(&json!(1), None),
            Err(Error::NotIterable { found: "number" })
        );
        assert_eq!(
            from(&Value::from("text"), None),
            Err(Error::NotIterable { found: "string" })
        );
    }
}
