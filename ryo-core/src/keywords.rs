//! Keyword-style helpers (`fn`, `lazy`, `in`, `delete`)

use crate::enumerable::levels;
use crate::error::Result;
use crate::function::{Arity, Call, Function};
use crate::lazy::Lazy;
use crate::object::Object;
use crate::value::Value;

/// Build a function value
pub fn function<F>(arity: Arity, body: F) -> Function
where
    F: Fn(&Call<'_>) -> Result<Value> + 'static,
{
    Function::new(arity, body)
}

/// Short alias for [`function`]
pub fn fn_<F>(arity: Arity, body: F) -> Function
where
    F: Fn(&Call<'_>) -> Result<Value> + 'static,
{
    function(arity, body)
}

/// Build a lazy value; `compute` receives the object reading it
pub fn lazy<F>(compute: F) -> Lazy
where
    F: Fn(&Object) -> Value + 'static,
{
    Lazy::new(compute)
}

/// Alias for [`lazy`]
pub fn memo<F>(compute: F) -> Lazy
where
    F: Fn(&Object) -> Value + 'static,
{
    lazy(compute)
}

/// Equivalent to JavaScript's `in` operator
pub fn is_in(object: &Object, name: &str) -> bool {
    object.is_in(name)
}

/// Delete `name` from the object and up to `depth` of its ancestors
///
/// `None` covers the whole chain, like [`Object::delete_through_chain`].
pub fn delete(object: &Object, name: &str, depth: Option<usize>) {
    for level in levels(object, depth) {
        level.delete(name);
    }
}
