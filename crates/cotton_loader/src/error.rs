//! Error types for template loading.

use std::path::PathBuf;

/// Errors returned while loading a template.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No file backs the template; another directory or loader may have it.
    #[error("template not found: {name}")]
    SourceUnavailable {
        /// The template name or file path that was looked up.
        name: String,
    },

    /// The template exists but holds no cotton syntax and should be loaded
    /// as a plain template.
    #[error("template {name} contains no cotton syntax")]
    NotApplicable {
        /// The template name.
        name: String,
    },

    /// The template file exists but could not be read.
    #[error("failed to read template {path}: {source}")]
    Io {
        /// The template file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl LoadError {
    /// Returns `true` for errors after which the next source may be tried.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LoadError::SourceUnavailable { .. } | LoadError::NotApplicable { .. }
        )
    }
}
