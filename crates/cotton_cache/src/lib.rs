//! Caching of compiled cotton templates.
//!
//! Compiled output is keyed by the template identity, the source file's
//! modification time and [`COMPILER_VERSION`] (see [`CacheKey`]), so an edit
//! to the source or a compiler upgrade invalidates entries without any
//! explicit eviction. [`TemplateCache`] fronts a [`CacheStore`]: either the
//! in-process [`MemoryStore`] or the on-disk [`FileStore`].

#![warn(missing_docs)]

pub mod error;
pub mod file_store;
pub mod handler;
pub mod key;
pub mod store;

pub use error::CacheError;
pub use file_store::FileStore;
pub use handler::TemplateCache;
pub use key::{CacheKey, COMPILER_VERSION};
pub use store::{CacheStore, MemoryStore};
