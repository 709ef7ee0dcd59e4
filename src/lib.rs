//! Quicksilver Arrays: the indexed collection engine of the Quicksilver runtime
//!
//! This crate implements the `Array.prototype` built-ins over arrays that are
//! backed either by a compact dense buffer or by the generic indexed property
//! protocol (sparse arrays, array-likes, string wrappers and proxies).
//!
//! # Features
//!
//! - **Dual representation**: hole-free, extensible dense arrays take a buffer
//!   fast path; everything else goes through observable property operations
//! - **Reentrancy safe**: callbacks, comparators and proxy traps may reshape the
//!   array they are called on while a routine runs
//! - **Species aware**: `map`, `filter`, `slice`, `splice` and `concat` build
//!   their results through the source's `constructor[@@species]`
//!
//! # Quick Start
//!
//! ```no_run
//! use quicksilver_arrays::{ArrayEngine, Value};
//!
//! fn main() -> quicksilver_arrays::Result<()> {
//!     let engine = ArrayEngine::default();
//!     let array = Value::new_array(vec![Value::Number(3.0), Value::Number(1.0)]);
//!     engine.call("push", &array, &[Value::Number(2.0)])?;
//!     engine.call("sort", &array, &[])?;
//!     println!("{}", engine.call("join", &array, &[Value::from("-")])?);
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`runtime`] | Values, array storage, the property protocol, the engine and its routines |
//! | [`config`] | [`EngineConfig`] |
//! | [`error`](Error) | Error types and message templates |

pub mod config;
pub mod error;
pub mod prelude;
pub mod runtime;

pub use config::EngineConfig;
pub use error::{Error, ErrorKind, Result};
pub use runtime::{ArrayEngine, ArrayMethod, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
