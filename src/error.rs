//! Error types for the Quicksilver array engine

use crate::runtime::Value;
use std::fmt;
use thiserror::Error;

/// Built-in routines an engine error propagated through, innermost first.
///
/// A callback that re-enters the engine adds one entry per nested routine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutineTrace(Vec<String>);

impl RoutineTrace {
    /// Routine names, innermost first
    pub fn routines(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether no routine has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RoutineTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for routine in &self.0 {
            writeln!(f, "    at {} (native)", routine)?;
        }
        Ok(())
    }
}

/// Main error type for the array engine
#[derive(Error, Debug)]
pub enum Error {
    /// Raised by the engine itself: bad receivers, bad callbacks, lengths out of range
    #[error("{kind}: {message}{}", trace_suffix(.trace))]
    Raised {
        kind: ErrorKind,
        message: String,
        trace: RoutineTrace,
    },

    /// A value thrown by user code (callback, comparator, proxy trap, constructor).
    /// Passed through the engine untouched.
    #[error("Uncaught {0}")]
    Thrown(Value),

    /// Broken engine invariant
    #[error("InternalError: {0}")]
    Internal(String),

    /// Invalid engine configuration
    #[error("ConfigError: {0}")]
    Config(String),
}

/// Kinds of engine-raised errors, named after the script-visible constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TypeError,
    RangeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
        })
    }
}

impl Error {
    fn raised(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error::Raised {
            kind,
            message: message.into(),
            trace: RoutineTrace::default(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::raised(ErrorKind::TypeError, message)
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        Self::raised(ErrorKind::RangeError, message)
    }

    /// Wrap a value thrown by user code
    pub fn thrown(value: Value) -> Self {
        Error::Thrown(value)
    }

    /// The script-visible kind of an engine-raised error.
    /// `None` for thrown values, internal failures and configuration errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Raised { kind, .. } => Some(*kind),
            Error::Thrown(_) | Error::Internal(_) | Error::Config(_) => None,
        }
    }

    /// The thrown value, if this error came from user code
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            Error::Thrown(value) => Some(value),
            _ => None,
        }
    }

    /// Record that the error left through `routine`. Thrown values stay untouched.
    pub fn with_native_frame(mut self, routine: &str) -> Self {
        if let Error::Raised { trace, .. } = &mut self {
            trace.0.push(routine.to_string());
        }
        self
    }
}

fn trace_suffix(trace: &RoutineTrace) -> String {
    if trace.is_empty() {
        String::new()
    } else {
        format!("\n{}", trace)
    }
}

/// Result type alias for the array engine
pub type Result<T> = std::result::Result<T, Error>;

/// Standardized error message templates
///
/// These constants provide consistent error messages following JavaScript conventions.
pub mod messages {
    pub const NOT_A_FUNCTION: &str = "is not a function";
    pub const NOT_A_CONSTRUCTOR: &str = "is not a constructor";

    pub const CALLBACK_NOT_CALLABLE: &str = "Callback function is not callable";
    pub const COMPARE_NOT_CALLABLE: &str = "Compare function is not callable";
    pub const REDUCE_EMPTY: &str = "Reduce of empty array with no initial value";
    pub const CONVERT_NULLISH: &str = "Cannot convert undefined or null to object";
    pub const INVALID_ARRAY_LENGTH: &str = "Invalid array length";
    pub const SPECIES_NOT_OBJECT: &str = "Array species constructor did not return an object";
    pub const CONSTRUCTOR_NOT_OBJECT: &str = "Array constructor property is not an object";

    /// Format a "X is not a function" error message
    pub fn not_a_function(name: &str) -> String {
        format!("'{}' {}", name, NOT_A_FUNCTION)
    }

    /// Format a "X is not a constructor" error message
    pub fn not_a_constructor(name: &str) -> String {
        format!("'{}' {}", name, NOT_A_CONSTRUCTOR)
    }

    /// Format a "Cannot add property X, object is not extensible" error message
    pub fn not_extensible(key: &str) -> String {
        format!("Cannot add property {}, object is not extensible", key)
    }

    /// Format a "Cannot assign to read only property X" error message
    pub fn read_only(key: &str) -> String {
        format!("Cannot assign to read only property '{}' of object", key)
    }

    /// Format a "Cannot delete property X" error message
    pub fn cannot_delete(key: &str) -> String {
        format!("Cannot delete property '{}' of object", key)
    }

    /// Format a "'trap' on proxy: trap returned falsish" error message
    pub fn proxy_falsish(trap: &str, key: &str) -> String {
        format!("'{}' on proxy: trap returned falsish for property '{}'", trap, key)
    }
}
