//! Lazy (memoized) property values
//!
//! A [`Lazy`] defers its computation until the property is first read. The
//! computation runs with the reading object as context and the resolved
//! value replaces the thunk in the slot it was found in.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::object::Object;
use crate::value::Value;

type Compute = dyn Fn(&Object) -> Value;

/// Evaluation state of a thunk
#[derive(Clone, Debug)]
pub enum LazyState {
    Pending,
    Resolved(Value),
}

struct LazyData {
    compute: Rc<Compute>,
    state: RefCell<LazyState>,
}

/// A deferred, self-memoizing property value
#[derive(Clone)]
pub struct Lazy(Rc<LazyData>);

impl Lazy {
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(&Object) -> Value + 'static,
    {
        Self::from_compute(Rc::new(compute))
    }

    fn from_compute(compute: Rc<Compute>) -> Self {
        Lazy(Rc::new(LazyData {
            compute,
            state: RefCell::new(LazyState::Pending),
        }))
    }

    pub fn state(&self) -> LazyState {
        self.0.state.borrow().clone()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.0.state.borrow(), LazyState::Resolved(_))
    }

    /// Resolve with `context` as the reading object; computes at most once
    pub(crate) fn force(&self, context: &Object) -> Value {
        if let LazyState::Resolved(value) = &*self.0.state.borrow() {
            return value.clone();
        }
        let value = (self.0.compute)(context);
        *self.0.state.borrow_mut() = LazyState::Resolved(value.clone());
        value
    }

    /// Independent copy for a duplicated slot
    pub(crate) fn fork(&self) -> Lazy {
        let fork = Self::from_compute(Rc::clone(&self.0.compute));
        *fork.0.state.borrow_mut() = self.state();
        fork
    }

    pub fn ptr_eq(&self, other: &Lazy) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Same thunk, or a fork of it that reached the same state
    pub fn same_thunk(&self, other: &Lazy) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if !Rc::ptr_eq(&self.0.compute, &other.0.compute) {
            return false;
        }
        match (&*self.0.state.borrow(), &*other.0.state.borrow()) {
            (LazyState::Pending, LazyState::Pending) => true,
            (LazyState::Resolved(a), LazyState::Resolved(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0.state.borrow() {
            LazyState::Pending => write!(f, "#<Ryo::Lazy pending>"),
            LazyState::Resolved(value) => write!(f, "#<Ryo::Lazy {value:?}>"),
        }
    }
}
