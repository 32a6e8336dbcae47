//! Bound functions
//!
//! A [`Function`] stored as a property has a special relationship with the
//! object it is written into: every write rebinds the function's receiver
//! ("self") to that object. The most recent write wins, so a function
//! shared through a prototype chain reports whichever object last stored it,
//! not the object it is being read through.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::object::{Object, WeakObject};
use crate::value::Value;

const TARGET: &str = ryo_config::Component::Engine.target();

/// Trailing block passed to a call
pub type Block<'a> = &'a dyn Fn(&[Value]) -> Result<Value>;

/// Number of arguments a callable accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    pub fn accepts(self, given: usize) -> bool {
        match self {
            Arity::Exact(n) => given == n,
            Arity::AtLeast(n) => given >= n,
            Arity::Any => true,
        }
    }

    /// Check `given` against this arity, naming `callee` on failure
    pub(crate) fn check(self, callee: &str, given: usize) -> Result<()> {
        if self.accepts(given) {
            Ok(())
        } else {
            Err(Error::Arity {
                callee: callee.to_string(),
                expected: self,
                given,
            })
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "{n}+"),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

/// Invocation context handed to a function body
pub struct Call<'a> {
    receiver: Option<Object>,
    args: &'a [Value],
    block: Option<Block<'a>>,
}

impl<'a> Call<'a> {
    /// The object the function is currently bound to
    pub fn receiver(&self) -> Option<&Object> {
        self.receiver.as_ref()
    }

    /// Read a property of the receiver ("self.name")
    pub fn get(&self, name: &str) -> Option<Value> {
        self.receiver.as_ref().and_then(|object| object.read(name))
    }

    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Positional argument; the arity check guarantees required ones exist
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or_else(Value::null)
    }

    /// Call the trailing block, if one was given
    pub fn yield_block(&self, args: &[Value]) -> Option<Result<Value>> {
        self.block.map(|block| block(args))
    }
}

type Body = dyn Fn(&Call<'_>) -> Result<Value>;

struct FunctionData {
    arity: Arity,
    body: Box<Body>,
    receiver: RefCell<Option<WeakObject>>,
}

/// A callable property value bound to the object it was last written into
#[derive(Clone)]
pub struct Function(Rc<FunctionData>);

impl Function {
    pub fn new<F>(arity: Arity, body: F) -> Self
    where
        F: Fn(&Call<'_>) -> Result<Value> + 'static,
    {
        Function(Rc::new(FunctionData {
            arity,
            body: Box::new(body),
            receiver: RefCell::new(None),
        }))
    }

    pub fn arity(&self) -> Arity {
        self.0.arity
    }

    /// The object "self" is bound to, if it is still alive
    pub fn receiver(&self) -> Option<Object> {
        self.0.receiver.borrow().as_ref().and_then(WeakObject::upgrade)
    }

    /// Change the receiver (self) of the function
    pub fn bind(&self, object: &Object) {
        trace!(target: TARGET, receiver = ?object.addr(), "bind function");
        *self.0.receiver.borrow_mut() = Some(object.downgrade());
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        self.call_with_block(args, None)
    }

    pub fn call_with_block(&self, args: &[Value], block: Option<Block<'_>>) -> Result<Value> {
        self.call_as("fn", args, block)
    }

    /// Call under the name it was dispatched as; arity errors report `callee`
    pub fn call_as(&self, callee: &str, args: &[Value], block: Option<Block<'_>>) -> Result<Value> {
        self.0.arity.check(callee, args.len())?;
        let call = Call {
            receiver: self.receiver(),
            args,
            block,
        };
        (self.0.body)(&call)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.receiver() {
            Some(receiver) => write!(
                f,
                "#<Ryo::Function arity={} receiver={:#x}>",
                self.0.arity,
                receiver.addr()
            ),
            None => write!(f, "#<Ryo::Function arity={} receiver=nil>", self.0.arity),
        }
    }
}
