//! The `kinds` command - print the basic kind table.

use dystruct::Basic;

use crate::common::CliResult;

/// Run the kinds command.
pub fn run() -> CliResult<()> {
    println!("{:<6} {:>4}  traits", "kind", "size");
    for basic in Basic::ALL {
        println!("{:<6} {:>4}  {}", basic.name(), basic.size(), traits(basic));
    }
    Ok(())
}

fn traits(basic: Basic) -> String {
    let words: Vec<&str> = [
        (basic.is_numeric(), "numeric"),
        (basic.is_integer(), "integer"),
        (basic.is_signed(), "signed"),
        (basic.is_float(), "float"),
    ]
    .into_iter()
    .filter_map(|(set, word)| set.then_some(word))
    .collect();

    if words.is_empty() {
        "-".to_string()
    } else {
        words.join(" ")
    }
}
