//! Cotton CLI: compile component templates, inspect cache keys and warm the
//! template cache from the command line.

#![warn(missing_docs)]

mod build;
mod clear;
mod compile;
mod key;
mod literal;
mod project;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Cotton, a component-tag compiler for Django templates.
#[derive(Parser, Debug)]
#[command(name = "cotton", version, about = "Cotton template compiler")]
pub struct Cli {
    /// Only report errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log each compile and cache lookup.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `cotton.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `cotton`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile one template and print the result.
    Compile(CompileArgs),
    /// Print the cache key for a template file.
    Key(KeyArgs),
    /// Compile every template under the configured directories.
    Build(BuildArgs),
    /// Evaluate an attribute default literal and print it as JSON.
    Literal(LiteralArgs),
    /// Remove all entries from the file cache.
    Clear,
}

/// Arguments for `cotton compile`.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Template file to compile.
    pub file: String,

    /// Template identity used in the output (defaults to the file path).
    #[arg(long)]
    pub name: Option<String>,

    /// Component base directory (overrides `compiler.dir`).
    #[arg(long)]
    pub dir: Option<String>,

    /// Write the compiled text here instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for `cotton key`.
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Template file whose modification time is used.
    pub file: String,

    /// Template identity hashed into the key (defaults to the file path).
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for `cotton build`.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Mirror compiled templates into this directory instead of the cache.
    #[arg(long)]
    pub out: Option<String>,
}

/// Arguments for `cotton literal`.
#[derive(Parser, Debug)]
pub struct LiteralArgs {
    /// Literal text, e.g. `['a', 1]`.
    pub text: String,

    /// Fail on text that is not a literal instead of treating it as a string.
    #[arg(long)]
    pub strict: bool,
}

/// Flags shared by every subcommand.
pub struct GlobalArgs {
    /// `--quiet`.
    pub quiet: bool,
    /// `--verbose`.
    pub verbose: bool,
    /// `--config`, if given.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Compile(ref args) => compile::run(args, &global),
        Command::Key(ref args) => key::run(args, &global),
        Command::Build(ref args) => build::run(args, &global),
        Command::Literal(ref args) => literal::run(args),
        Command::Clear => clear::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "cotton=debug"
    } else {
        "cotton=info"
    }
}
