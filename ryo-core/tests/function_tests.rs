//! Functions, lazy values and attribute dispatch

mod common;
use common::{int, point};

use std::cell::Cell;
use std::rc::Rc;

use ryo_core::{create, fn_, lazy, Arity, Error, Object, Result, Value};

fn x_getter() -> ryo_core::Function {
    fn_(Arity::Exact(0), |call| Ok(call.get("x").into()))
}

// ===== Receiver binding =====

#[test]
fn test_function_sees_its_receiver() {
    let p = point(None, 3, 4);
    p.write(
        "sum",
        fn_(Arity::Exact(0), |call| {
            let x = call.get("x").and_then(|v| v.as_int()).unwrap_or(0);
            let y = call.get("y").and_then(|v| v.as_int()).unwrap_or(0);
            Ok(Value::from(x + y))
        }),
    );
    let sum = p.get_attr("sum").unwrap().unwrap();
    assert_eq!(sum.as_function().unwrap().call(&[]).unwrap(), Value::from(7));

    // a trailing block also triggers the call
    let block = |_: &[Value]| -> Result<Value> { Ok(Value::null()) };
    assert_eq!(p.send("sum", &[], Some(&block)).unwrap(), Some(Value::from(7)));
}

#[test]
fn test_last_write_wins_binding() {
    let shared = x_getter();
    let a = create(None, [("x", 1)]);
    let b = create(None, [("x", 2)]);

    a.write("get_x", shared.clone());
    b.write("get_x", shared.clone());

    // both objects now hold the same function, bound to b
    assert_eq!(shared.call(&[]).unwrap(), Value::from(2));
    let through_a = a.read("get_x").unwrap();
    assert_eq!(through_a.as_function().unwrap().call(&[]).unwrap(), Value::from(2));
}

#[test]
fn test_inherited_function_keeps_prototype_receiver() {
    let base = create(None, [("x", 1)]);
    base.write("get_x", x_getter());
    let child = create(Some(&base), [("x", 99)]);

    let function = child.read("get_x").unwrap();
    assert_eq!(function.as_function().unwrap().call(&[]).unwrap(), Value::from(1));
}

#[test]
fn test_dropped_receiver_reads_as_none() {
    let function = x_getter();
    {
        let temp = create(None, [("x", 1)]);
        temp.write("f", function.clone());
    }
    assert!(function.receiver().is_none());
    assert!(function.call(&[]).unwrap().is_null());
}

#[test]
fn test_arity_error_names_dispatched_property() {
    let object = Object::new(None);
    object.write("add", fn_(Arity::Exact(2), |call| {
        let a = call.arg(0).as_int().unwrap_or(0);
        let b = call.arg(1).as_int().unwrap_or(0);
        Ok(Value::from(a + b))
    }));
    let err = object.send("add", &[Value::from(1)], None).unwrap_err();
    assert_eq!(
        err,
        Error::Arity {
            callee: "add".to_string(),
            expected: Arity::Exact(2),
            given: 1
        }
    );
}

#[test]
fn test_raised_error_propagates() {
    let object = Object::new(None);
    object.write("boom", fn_(Arity::Any, |_| Err(Error::raised("boom"))));
    assert_eq!(
        object.send("boom", &[Value::from(1)], None),
        Err(Error::Raised("boom".to_string()))
    );
}

// ===== Lazy values =====

#[test]
fn test_lazy_computes_once_per_slot() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let object = create(
        None,
        [(
            "expensive",
            lazy(move |_| {
                counter.set(counter.get() + 1);
                Value::from(42)
            }),
        )],
    );

    assert!(object.table()["expensive"].is_lazy());
    assert_eq!(int(&object, "expensive"), Some(42));
    assert_eq!(int(&object, "expensive"), Some(42));
    assert_eq!(calls.get(), 1);
    assert!(!object.table()["expensive"].is_lazy());
}

#[test]
fn test_lazy_uses_reading_object_as_context() {
    let base = Object::new(None);
    base.write(
        "double",
        lazy(|reader| Value::from(reader.read("x").and_then(|v| v.as_int()).unwrap_or(0) * 2)),
    );
    let child = create(Some(&base), [("x", 21)]);

    assert_eq!(int(&child, "double"), Some(42));
    assert_eq!(base.table()["double"], Value::from(42));
}

// ===== Attribute dispatch =====

#[test]
fn test_setter_sugar_and_getter() {
    let object = Object::new(None);
    object.send("x=", &[Value::from(1)], None).unwrap();
    assert_eq!(object.get_attr("x").unwrap(), Some(Value::from(1)));
    assert!(matches!(
        object.send("x=", &[], None),
        Err(Error::Arity { expected: Arity::Exact(1), given: 0, .. })
    ));
}

#[test]
fn test_predicate_names_only_take_explicit_writes() {
    let object = Object::new(None);
    assert_eq!(
        object.set_attr("valid?", true),
        Err(Error::NoMethod {
            name: "valid?=".to_string()
        })
    );
    assert_eq!(object.read("valid?"), None);

    object.write("valid?", true);
    assert_eq!(object.get_attr("valid?").unwrap(), Some(Value::from(true)));
    assert!(object.send("valid?=", &[Value::from(false)], None).is_err());
    assert!(!object.respond_to("valid?="));
}

#[test]
fn test_shadowed_protocol_reads_without_arguments() {
    let object = create(None, [("inspect", "custom"), ("tap", "stored")]);

    assert_eq!(object.get_attr("inspect").unwrap(), Some(Value::from("custom")));
    assert_eq!(object.get_attr("tap").unwrap(), Some(Value::from("stored")));

    let seen = Cell::new(false);
    let block = |args: &[Value]| -> Result<Value> {
        seen.set(args.len() == 1);
        Ok(Value::null())
    };
    let result = object.send("tap", &[], Some(&block)).unwrap();
    assert!(seen.get());
    assert!(result.and_then(|v| v.as_object().cloned()).is_some_and(|o| o.ptr_eq(&object)));
}

#[test]
fn test_shadowed_eq_with_argument_compares() {
    let a = create(None, [("==", "stored")]);
    let b = create(None, [("==", "stored")]);
    assert_eq!(a.get_attr("==").unwrap(), Some(Value::from("stored")));
    assert_eq!(
        a.send("==", &[Value::Object(b)], None).unwrap(),
        Some(Value::from(true))
    );
}

#[test]
fn test_respond_to() {
    let base = create(None, [("x", 1)]);
    let child = Object::new(Some(&base));
    assert!(child.respond_to("x"));
    assert!(child.respond_to("y="));
    assert!(child.respond_to("inspect"));
    assert!(!child.respond_to("y"));
}
