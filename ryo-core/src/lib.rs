//! Ryo Core - prototype-based objects (pure logic, no IO)
//!
//! Contains the value model, the property resolution engine, accessor
//! synthesis and attribute dispatch, the recursive builder, and
//! prototype-chain-aware traversal.
//!
//! Objects are single-threaded shared handles (`Rc`). Reads forward along
//! the prototype chain, writes always land on the object itself.

pub mod builder;
pub mod config;
pub mod enumerable;
pub mod error;
pub mod function;
pub mod keywords;
pub mod lazy;
pub mod object;
pub mod reflect;
pub mod value;

// Re-export common types
pub use builder::{create, from, Buildable, Shape};
pub use error::{Error, Result};
pub use function::{Arity, Block, Call, Function};
pub use keywords::{fn_, function, lazy, memo};
pub use lazy::{Lazy, LazyState};
pub use object::{Accessor, AccessorRegistry, Lineage, Object, WeakObject};
pub use reflect::{
    assign, dup, is_function, is_lazy, is_ryo, properties_of, prototype_chain_of, prototype_of,
    same_object, set_prototype_of, table_of, OwnPairs,
};
pub use value::{Scalar, Table, Value};

// Re-export config types from ryo-config
pub use ryo_config::{Component, EngineConfig, Protocol, ProtocolConfig, TraversalConfig};
