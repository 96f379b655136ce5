//! Shared foundational types used across the Cotton template compiler.
//!
//! This crate provides content hashing for cache integrity, the SHA-256
//! identity digest used in cache keys and the modification-time value that
//! keys compiled output.

#![warn(missing_docs)]

pub mod hash;
pub mod mtime;

pub use hash::{ContentHash, IdentityDigest};
pub use mtime::Mtime;

/// Base directory that component tags resolve under when none is configured.
pub const DEFAULT_COTTON_DIR: &str = "cotton";
