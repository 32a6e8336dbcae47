//! Test helpers
//!
//! Shared fixtures for the integration tests

#![allow(dead_code)]

use ryo_core::{create, Object, Value};

/// `create(prototype, {x, y})`
pub fn point(prototype: Option<&Object>, x: i64, y: i64) -> Object {
    create(prototype, [("x", x), ("y", y)])
}

/// Read an integer property
pub fn int(object: &Object, name: &str) -> Option<i64> {
    object.read(name)?.as_int()
}

/// Read a string property
pub fn string(object: &Object, name: &str) -> Option<String> {
    object.read(name)?.as_str().map(str::to_string)
}

/// Read a nested object property
pub fn nested(object: &Object, name: &str) -> Option<Object> {
    object.read(name)?.as_object().cloned()
}

/// Unwrap a value that must be an object
pub fn object_of(value: Value) -> Object {
    match value {
        Value::Object(object) => object,
        other => panic!("expected a ryo object, got {other:?}"),
    }
}

/// Install a test subscriber so engine events are printed on failure
pub fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
