//! Error handling utilities for the CLI.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Registry(#[from] dystruct::Error),

    #[error("invalid field `{0}`: expected `name:kind` or `name:kind[count]`")]
    FieldSpec(String),

    #[error("unknown kind `{kind}` in field `{field}`")]
    UnknownKind { field: String, kind: String },
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Print an error to stderr and exit with code 1.
pub fn render_and_exit(error: CliError) -> ! {
    eprintln!("error: {error}");
    std::process::exit(1);
}
