//! Shapes and layouts for run-time defined structs.
//!
//! This crate describes memory layouts that are decided at run time: basic
//! scalars, enumerations, fixed arrays and densely packed aggregates. Shapes
//! are owned by a [`ShapeArena`] and refer to each other by [`ShapeId`]; a
//! shape graph can be frozen into an owned [`Layout`] and fingerprinted with
//! the one-at-a-time [`Hasher`].
//!
//! # Example
//!
//! ```
//! use dystruct_types::{Basic, ShapeArena};
//!
//! let mut arena = ShapeArena::new();
//! let u64_ty = arena.insert_basic(Basic::U64);
//! let arr = arena.insert_array(50, u64_ty).unwrap();
//!
//! assert_eq!(arena.size_of(arr), Ok(400));
//! assert_eq!(arena.is_fixed_footprint(arr), Ok(true));
//! ```

#![no_std]
extern crate alloc;

pub mod core;
pub mod hasher;
pub mod layout;

mod arena;
mod error;

pub use arena::ShapeArena;
pub use self::core::{
    AggregateShape, ArrayShape, Basic, BasicFlags, EnumEntry, EnumShape, Family, FamilyFlags,
    Field, Shape, ShapeId,
};
pub use error::ShapeError;
pub use hasher::Hasher;
pub use layout::{FieldLayout, Layout, LayoutKind};
