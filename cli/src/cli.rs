//! Command-line interface definitions.
//!
//! This module contains only clap struct definitions - no business logic.
//! All command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};

/// dystruct - build and inspect struct layouts defined at run time
#[derive(Parser, Debug)]
#[command(name = "dystruct", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log registry activity at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a U64 and a three-field vector, then write and read them back
    Demo,

    /// Print the table of basic kinds
    Kinds,

    /// Lay out an aggregate from field specs and print its offsets
    Layout(LayoutArgs),

    /// Print the one-at-a-time hash of a text
    Hash(HashArgs),
}

/// Arguments for the `layout` command.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Fields in declaration order, as `name:kind` or `name:kind[count]`
    #[arg(required = true, value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Name to compile the aggregate under
    #[arg(long, default_value = "Layout")]
    pub name: String,
}

/// Arguments for the `hash` command.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Text to hash, as UTF-8 bytes
    pub text: String,
}
