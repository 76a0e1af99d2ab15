//! Command implementations.
//!
//! Each subcommand has its own module with a `run` function.

pub mod demo;
pub mod hash;
pub mod kinds;
pub mod layout;
