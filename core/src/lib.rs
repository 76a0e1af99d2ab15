//! Registry, compiled types and instances for run-time defined structs.
//!
//! Shapes are assembled through a [`TypeManager`], compiled into named
//! [`CompiledType`]s, and instantiated as raw [`Instance`]s whose fields are
//! read and written through accessors built once per field.
//!
//! Everything here is single-threaded: compiled types are shared with `Rc`.

mod compiled;
mod error;
mod instance;
mod manager;
mod options;

pub use compiled::CompiledType;
pub use error::{Error, Result};
pub use instance::Instance;
pub use manager::TypeManager;
pub use options::TypeManagerOptions;
