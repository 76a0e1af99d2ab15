//! Typed access to run-time laid out storage.
//!
//! [`Primitive`] ties each basic kind to its Rust value type, and the
//! accessors in [`accessor`] turn a byte offset into loads and stores of that
//! type. Accessors work on plain byte slices; the registry in `dystruct-core`
//! hands them out already validated against a compiled type.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod accessor;
pub mod primitive;

pub use accessor::{Accessor, EnumAccessor, StrideAccessor};
pub use primitive::{Byte, Char, Primitive, WChar};
