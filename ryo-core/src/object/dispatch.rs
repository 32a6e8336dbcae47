//! Attribute-style dispatch
//!
//! `point.x`, `point.x = 1` and `point.tap { .. }` all come through
//! [`Object::send`]. Lookup order:
//!
//! 1. `name=` setter sugar
//! 2. the accessor registry (protocol names branch on arguments/block)
//! 3. an unshadowed protocol name
//! 4. a plain [`Object::read`]
//!
//! A function found by steps 2 or 4 is invoked when arguments or a block
//! are given, and returned unevaluated otherwise.

use ryo_config::Protocol;
use tracing::trace;

use super::Object;
use crate::config::config;
use crate::error::{Error, Result};
use crate::function::{Arity, Block};
use crate::value::Value;

const TARGET: &str = ryo_config::Component::Accessor.target();

/// The property assigned by setter sugar (`"x="` -> `"x"`)
///
/// Predicate names have no setter and are writable through
/// [`Object::write`] only, so their sugar is an error.
fn setter_target(name: &str) -> Option<Result<&str>> {
    let property = name.strip_suffix('=')?;
    if property.is_empty() || property.ends_with('=') || config().protocols.lookup(name).is_some()
    {
        return None;
    }
    if property.ends_with(config().predicate_suffix) {
        return Some(Err(Error::NoMethod {
            name: name.to_string(),
        }));
    }
    Some(Ok(property))
}

impl Object {
    /// Attribute read (`object.name`)
    pub fn get_attr(&self, name: &str) -> Result<Option<Value>> {
        self.send(name, &[], None)
    }

    /// Attribute assignment (`object.name = value`)
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.send(&format!("{name}="), &[value.into()], None)
            .map(|_| ())
    }

    /// Dispatch `name` with arguments and an optional trailing block
    pub fn send(
        &self,
        name: &str,
        args: &[Value],
        block: Option<Block<'_>>,
    ) -> Result<Option<Value>> {
        trace!(target: TARGET, name, args = args.len(), block = block.is_some(), "send");
        let invoked = !args.is_empty() || block.is_some();

        if let Some(property) = setter_target(name) {
            return self.assign_attr(name, property?, args);
        }

        let accessor = self.0.borrow().accessors.getter(name);
        if let Some(accessor) = accessor {
            return match accessor.protocol {
                Some(protocol) if invoked => self.run_protocol(protocol, args, block),
                _ => self.invoke(name, accessor.get(self, name), args, block),
            };
        }

        if let Some(protocol) = config().protocols.lookup(name) {
            return self.run_protocol(protocol, args, block);
        }

        self.invoke(name, self.read(name), args, block)
    }

    /// Whether `send(name)` would reach something
    pub fn respond_to(&self, name: &str) -> bool {
        setter_target(name).is_some_and(|target| target.is_ok())
            || self.0.borrow().accessors.getter(name).is_some()
            || config().protocols.lookup(name).is_some()
            || self.is_in(name)
    }

    fn assign_attr(&self, name: &str, property: &str, args: &[Value]) -> Result<Option<Value>> {
        Arity::Exact(1).check(name, args.len())?;
        let value = args[0].clone();
        let setter = self.0.borrow().accessors.setter(property);
        match setter {
            Some(set) => set(self, property, value.clone()),
            None => self.write(property, value.clone()),
        }
        Ok(Some(value))
    }

    /// Steps 1 and 4 only: what `method_missing` falls back to
    fn dispatch_missing(
        &self,
        name: &str,
        args: &[Value],
        block: Option<Block<'_>>,
    ) -> Result<Option<Value>> {
        match setter_target(name) {
            Some(property) => self.assign_attr(name, property?, args),
            None => self.invoke(name, self.read(name), args, block),
        }
    }

    fn invoke(
        &self,
        name: &str,
        value: Option<Value>,
        args: &[Value],
        block: Option<Block<'_>>,
    ) -> Result<Option<Value>> {
        match value {
            Some(Value::Function(function)) if !args.is_empty() || block.is_some() => {
                function.call_as(name, args, block).map(Some)
            }
            value if args.is_empty() => Ok(value),
            _ => Err(Error::Arity {
                callee: name.to_string(),
                expected: Arity::Exact(0),
                given: args.len(),
            }),
        }
    }

    fn run_protocol(
        &self,
        protocol: Protocol,
        args: &[Value],
        block: Option<Block<'_>>,
    ) -> Result<Option<Value>> {
        trace!(target: TARGET, ?protocol, "protocol dispatch");
        match protocol {
            Protocol::Inspect => {
                Arity::Exact(0).check("inspect", args.len())?;
                Ok(Some(Value::from(format!("{self:?}"))))
            }
            Protocol::Eq => {
                Arity::Exact(1).check("==", args.len())?;
                Ok(Some(Value::from(self.equals(&args[0]))))
            }
            Protocol::RespondTo => {
                Arity::Exact(1).check("respond_to?", args.len())?;
                let responds = args[0].as_str().is_some_and(|name| self.respond_to(name));
                Ok(Some(Value::from(responds)))
            }
            Protocol::MethodMissing => {
                Arity::AtLeast(1).check("method_missing", args.len())?;
                let name = args[0]
                    .as_str()
                    .ok_or_else(|| Error::raised("method_missing expects a property name"))?;
                self.dispatch_missing(name, &args[1..], block)
            }
            Protocol::Tap => {
                Arity::Exact(0).check("tap", args.len())?;
                let receiver = Value::Object(self.clone());
                if let Some(block) = block {
                    block(&[receiver.clone()])?;
                }
                Ok(Some(receiver))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;

    #[test]
    fn test_attr_read_and_write() {
        let point = Object::new(None);
        point.set_attr("x", 1).unwrap();
        assert_eq!(point.get_attr("x").unwrap(), Some(Value::from(1)));
        assert_eq!(point.get_attr("y").unwrap(), None);
        assert_eq!(point.accessors().syntheses(), 1);
    }

    #[test]
    fn test_attr_falls_through_to_prototype() {
        let base = Object::new(None);
        base.write("x", 3);
        let child = Object::new(Some(&base));
        assert_eq!(child.get_attr("x").unwrap(), Some(Value::from(3)));
    }

    #[test]
    fn test_send_invokes_functions_with_args() {
        let point = Object::new(None);
        point.write("x", 2);
        point.write(
            "multiply",
            Function::new(Arity::Exact(1), |call| {
                let x = call.get("x").and_then(|v| v.as_int()).unwrap_or(0);
                let by = call.arg(0).as_int().unwrap_or(0);
                Ok(Value::from(x * by))
            }),
        );

        assert!(point.get_attr("multiply").unwrap().is_some_and(|v| v.is_function()));
        assert_eq!(
            point.send("multiply", &[Value::from(5)], None).unwrap(),
            Some(Value::from(10))
        );
        assert!(matches!(
            point.send("multiply", &[Value::from(1), Value::from(2)], None),
            Err(Error::Arity { given: 2, .. })
        ));
    }

    #[test]
    fn test_args_to_plain_property_fail() {
        let point = Object::new(None);
        point.write("x", 2);
        assert!(matches!(
            point.send("x", &[Value::from(1)], None),
            Err(Error::Arity { expected: Arity::Exact(0), given: 1, .. })
        ));
    }

    #[test]
    fn test_protocol_collision_branches() {
        let object = Object::new(None);
        object.write("tap", "stored");

        assert_eq!(object.get_attr("tap").unwrap(), Some(Value::from("stored")));

        let block = |args: &[Value]| -> Result<Value> {
            assert!(args[0].as_object().is_some());
            Ok(Value::null())
        };
        let tapped = object.send("tap", &[], Some(&block)).unwrap();
        assert!(tapped
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(|o| o.ptr_eq(&object)));
    }

    #[test]
    fn test_unshadowed_protocols() {
        let a = Object::new(None);
        a.write("x", 1);
        let b = Object::new(None);
        b.write("x", 1);

        assert_eq!(
            a.send("==", &[Value::Object(b)], None).unwrap(),
            Some(Value::from(true))
        );
        assert_eq!(
            a.send("respond_to?", &[Value::from("x")], None).unwrap(),
            Some(Value::from(true))
        );
        assert_eq!(
            a.send("respond_to?", &[Value::from("nope")], None).unwrap(),
            Some(Value::from(false))
        );
        let inspected = a.get_attr("inspect").unwrap();
        assert!(inspected
            .as_ref()
            .and_then(Value::as_str)
            .is_some_and(|s| s.starts_with("#<Ryo object=")));
    }

    #[test]
    fn test_method_missing_dispatch() {
        let object = Object::new(None);
        object
            .send("method_missing", &[Value::from("y="), Value::from(4)], None)
            .unwrap();
        assert_eq!(object.read("y"), Some(Value::from(4)));
        assert_eq!(
            object
                .send("method_missing", &[Value::from("y")], None)
                .unwrap(),
            Some(Value::from(4))
        );
    }

    #[test]
    fn test_predicate_names_reject_assignment_sugar() {
        let object = Object::new(None);
        assert_eq!(
            object.set_attr("enabled?", true),
            Err(Error::NoMethod {
                name: "enabled?=".to_string()
            })
        );
        assert!(!object.has_own("enabled?"));
        assert!(!object.respond_to("enabled?="));

        object.write("enabled?", true);
        assert_eq!(object.get_attr("enabled?").unwrap(), Some(Value::from(true)));
        assert!(object.accessors().setter("enabled?").is_none());
        assert!(object.set_attr("enabled?", false).is_err());
        assert_eq!(object.read("enabled?"), Some(Value::from(true)));
    }

    #[test]
    fn test_equality_operator_is_not_setter_sugar() {
        assert_eq!(setter_target("x="), Some(Ok("x")));
        assert_eq!(setter_target("=="), None);
        assert_eq!(setter_target("="), None);
        assert!(matches!(setter_target("ok?="), Some(Err(Error::NoMethod { .. }))));
    }
}
