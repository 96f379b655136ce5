//! Tolerant, lossless markup tree for the Cotton template compiler.
//!
//! [`parse`] turns template source into a [`Document`] without ever failing,
//! and [`Document::to_html`] writes it back out. Unmodified markup survives
//! the round trip byte for byte, including whitespace between attributes,
//! repeated attributes and end tags that close nothing.

#![warn(missing_docs)]

pub mod arena;
pub mod document;
pub mod dupe;
pub mod node;
pub mod parser;

pub use arena::NodeId;
pub use document::Document;
pub use dupe::{mask_duplicate, DUPE_ATTR_MARKER, DUPE_SUFFIX_LEN};
pub use node::{Attribute, Element, Node, NodeKind, Quote};
pub use parser::parse;
