//! Template loading for cotton.
//!
//! A [`Loader`] searches its directories for a template name, compiles the
//! source when it uses cotton syntax and caches the compiled text under a
//! key derived from the template name and the file's modification time.
//! Plain templates are reported as [`LoadError::NotApplicable`] so the
//! caller can load them unchanged.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod origin;

pub use error::LoadError;
pub use loader::{LoadedTemplate, Loader};
pub use origin::{safe_join, Origin};
