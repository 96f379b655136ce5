//! `cotton literal`: evaluate an attribute default literal.

use cotton_compiler::{eval_default, parse_literal};

use crate::LiteralArgs;

/// Runs the `cotton literal` command, printing the value as JSON.
pub fn run(args: &LiteralArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let value = if args.strict {
        parse_literal(&args.text)?
    } else {
        eval_default(&args.text)
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(0)
}
