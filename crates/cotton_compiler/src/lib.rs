//! Compiler from cotton component tags to Django template directives.
//!
//! [`CottonCompiler::process`] runs the full pipeline:
//!
//! 1. [`shield`] replaces `{% %}`, `{{ }}` and verbatim blocks with tokens;
//! 2. the shielded text is parsed with [`cotton_markup`];
//! 3. [`vars`] turns a root `<c-vars>` into a vars frame;
//! 4. [`transform`] rewrites components and slots into directive pairs;
//! 5. the tree is serialized and [`restore`] puts the host syntax back;
//! 6. [`unmask`] strips the duplicate-attribute markers.
//!
//! [`literal`] holds the render-time parser for `eval_default` values.

#![warn(missing_docs)]

pub mod compiler;
pub mod directive;
pub mod error;
pub mod literal;
pub mod restore;
pub mod shield;
pub mod transform;
pub mod unmask;
pub mod vars;

pub use compiler::{CompilerOptions, CottonCompiler};
pub use error::CompileError;
pub use literal::{eval_default, parse_literal, Literal, LiteralError};
pub use shield::{Placeholder, PlaceholderKind, Shielded};
