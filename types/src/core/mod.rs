//! Core shape vocabulary.
//!
//! - [`Family`] and [`Basic`]: closed tags with static trait tables
//! - [`FamilyFlags`] and [`BasicFlags`]: the classification bits of those tables
//! - [`Shape`]: one node of a type graph, with its per-family payloads
//!
//! Shapes only describe themselves; sizes that depend on other shapes are
//! resolved by [`ShapeArena`](crate::ShapeArena).

mod flags;
mod kind;
mod shape;

pub use flags::{BasicFlags, FamilyFlags};
pub use kind::{Basic, BasicTraits, Family, FamilyTraits, UnknownBasic};
pub use shape::{AggregateShape, ArrayShape, EnumEntry, EnumShape, Field, Shape, ShapeId};
