//! Prelude module for convenient imports
//!
//! ```no_run
//! use quicksilver_arrays::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let engine = ArrayEngine::new(EngineConfig::default());
//!     let array = Value::new_array(vec![Value::Number(1.0)]);
//!     let length = engine.call_method(ArrayMethod::Push, &array, &[Value::Null])?;
//!     println!("{:?}", length);
//!     Ok(())
//! }
//! ```

// Engine and values
pub use crate::runtime::{array_elements, ArrayEngine, ArrayMethod, ObjectKind, ObjectRef, Value};

// Property protocol
pub use crate::runtime::{IndexedObject, CONCAT_SPREADABLE_KEY, SPECIES_KEY};

// Configuration
pub use crate::config::EngineConfig;

// Error handling
pub use crate::error::{Error, ErrorKind, Result, RoutineTrace};
