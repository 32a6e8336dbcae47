//! Property values
//!
//! A property holds a scalar, a nested object, a sequence, a bound function
//! or a lazy thunk.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{Error as _, Serialize, SerializeSeq, Serializer};

use crate::function::Function;
use crate::lazy::Lazy;
use crate::object::Object;

/// Ordered own-property table
pub type Table = IndexMap<String, Value>;

/// Opaque caller data
#[derive(Clone)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Host data the engine never looks into; compared by identity
    Foreign(Rc<dyn Any>),
}

/// Property value
#[derive(Clone)]
pub enum Value {
    Scalar(Scalar),
    Object(Object),
    Sequence(Vec<Value>),
    Function(Function),
    Lazy(Lazy),
}

impl Scalar {
    /// Type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "string",
            Scalar::Foreign(_) => "foreign value",
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b,
            (Scalar::Int(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Int(a)) => {
                *a as f64 == *b
            }
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::Foreign(a), Scalar::Foreign(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "nil"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n:?}"),
            Scalar::Str(s) => write!(f, "{s:?}"),
            Scalar::Foreign(data) => write!(f, "#<foreign {:p}>", Rc::as_ptr(data)),
        }
    }
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Wrap host data as an opaque scalar
    pub fn foreign<T: Any>(data: T) -> Self {
        Value::Scalar(Scalar::Foreign(Rc::new(data)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view (integers widen to float)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar::Float(n)) => Some(*n),
            Value::Scalar(Scalar::Int(n)) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested object, if this value is one
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_foreign<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Scalar(Scalar::Foreign(data)) => data.downcast_ref(),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Value::Lazy(_))
    }

    /// Type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(scalar) => scalar.type_name(),
            Value::Object(_) => "ryo object",
            Value::Sequence(_) => "sequence",
            Value::Function(_) => "function",
            Value::Lazy(_) => "lazy value",
        }
    }

    /// Copy used by `dup`: pending lazy thunks get their own slot state
    pub(crate) fn duplicate(&self) -> Value {
        match self {
            Value::Lazy(lazy) => Value::Lazy(lazy.fork()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Lazy(a), Value::Lazy(b)) => a.same_thunk(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(scalar) => scalar.fmt(f),
            Value::Object(object) => object.fmt(f),
            Value::Sequence(items) => f.debug_list().entries(items).finish(),
            Value::Function(function) => function.fmt(f),
            Value::Lazy(lazy) => lazy.fmt(f),
        }
    }
}

// ==================== Conversions ====================

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Scalar(Scalar::Int(n.into()))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Int(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(Scalar::Float(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Lazy> for Value {
    fn from(lazy: Lazy) -> Self {
        Value::Lazy(lazy)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Value::null, Into::into)
    }
}

impl PartialEq<serde_json::Value> for Value {
    fn eq(&self, other: &serde_json::Value) -> bool {
        use serde_json::Value as Json;

        match (self, other) {
            (Value::Scalar(Scalar::Null), Json::Null) => true,
            (Value::Scalar(Scalar::Bool(a)), Json::Bool(b)) => a == b,
            (Value::Scalar(Scalar::Int(a)), Json::Number(b)) => b.as_i64() == Some(*a),
            (Value::Scalar(Scalar::Float(a)), Json::Number(b)) => b.as_f64() == Some(*a),
            (Value::Scalar(Scalar::Str(a)), Json::String(b)) => a == b,
            (Value::Sequence(items), Json::Array(array)) => {
                items.len() == array.len() && items.iter().zip(array).all(|(a, b)| a == b)
            }
            (Value::Object(object), json) => object == json,
            _ => false,
        }
    }
}

// ==================== Serialization ====================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Value::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Value::Scalar(Scalar::Int(n)) => serializer.serialize_i64(*n),
            Value::Scalar(Scalar::Float(n)) => serializer.serialize_f64(*n),
            Value::Scalar(Scalar::Str(s)) => serializer.serialize_str(s),
            Value::Object(object) => object.serialize(serializer),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            other => Err(S::Error::custom(format!(
                "a {} cannot be serialized",
                other.type_name()
            ))),
        }
    }
}
