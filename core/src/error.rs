//! Public error type of the registry.
//!
//! Shape-level failures keep their [`ShapeError`] detail; the remaining
//! variants cover naming, ownership and the checks made when an accessor is
//! built.

use dystruct_types::{Basic, Family, ShapeError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// `compile` was given a name that is already registered.
    #[error("a compiled type named `{0}` already exists")]
    DuplicateName(String),

    /// The compiled type was built by another manager, or already destroyed.
    #[error("compiled type `{0}` is not owned by this type manager")]
    NotOwned(String),

    #[error("`{ty}` is {found}, not a basic value")]
    NotBasic { ty: String, found: Family },

    #[error("accessor for {expected} cannot read a {found} value")]
    KindMismatch { expected: Basic, found: Basic },

    #[error("`{0}` is not an aggregate")]
    NotAnAggregate(String),

    #[error("`{ty}` has no field `{field}`")]
    UnknownField { ty: String, field: String },

    #[error("`{0}` is not an array")]
    NotAnArray(String),

    #[error("`{0}` is not an enum")]
    NotAnEnum(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
