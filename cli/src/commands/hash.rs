//! The `hash` command - one-at-a-time hash of a text.

use dystruct::hasher::one_at_a_time;

use crate::cli::HashArgs;
use crate::common::CliResult;

/// Run the hash command.
pub fn run(args: HashArgs) -> CliResult<()> {
    println!("{:#010x}", one_at_a_time(args.text.as_bytes()));
    Ok(())
}
