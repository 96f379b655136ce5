//! Parsing and validation of `cotton.toml` configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`CottonConfig`]: the component base directory, the template search
//! directories, and the compiled-template cache settings.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_cache_path, resolve_dirs};
pub use types::*;
