//! Error types
//!
//! A missing property is never an error: lookups return `Option`. Only the
//! builder (non-iterable source), function invocation and assignment sugar
//! on predicate names can fail.

use thiserror::Error;

use crate::function::Arity;

/// Ryo error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The builder was given a source with no pair or sequence iteration
    #[error("TypeError: the provided {found} does not implement each / each_pair")]
    NotIterable { found: &'static str },

    /// A callable was invoked with the wrong number of arguments
    #[error("ArgumentError: {callee} expects {expected} argument(s), given {given}")]
    Arity {
        callee: String,
        expected: Arity,
        given: usize,
    },

    /// Assignment sugar on a name that has no setter (`enabled?=`)
    #[error("NoMethodError: undefined method '{name}' for a ryo object")]
    NoMethod { name: String },

    /// Raised from inside a function body
    #[error("{0}")]
    Raised(String),

    /// The process-wide engine configuration was set twice
    #[error("engine configuration already initialized")]
    ConfigAlreadyInitialized,
}

impl Error {
    /// Shorthand for raising from a function body
    pub fn raised(message: impl Into<String>) -> Self {
        Error::Raised(message.into())
    }
}

/// Convenient `Result` alias
pub type Result<T> = std::result::Result<T, Error>;
