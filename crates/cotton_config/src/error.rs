//! Errors raised while reading `cotton.toml`.

use std::path::PathBuf;

/// A `cotton.toml` that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or has fields of the wrong type.
    #[error("invalid cotton.toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting that must have a value is blank.
    #[error("`{0}` must not be empty")]
    Empty(&'static str),

    /// `compiler.dir` would resolve components outside the template tree.
    #[error("compiler.dir {dir:?} {reason}")]
    ComponentDir {
        /// The configured directory.
        dir: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_the_setting() {
        assert_eq!(
            ConfigError::Empty("cache.path").to_string(),
            "`cache.path` must not be empty"
        );
    }

    #[test]
    fn component_dir_message() {
        let err = ConfigError::ComponentDir {
            dir: "/abs".to_string(),
            reason: "must be relative",
        };
        assert_eq!(err.to_string(), "compiler.dir \"/abs\" must be relative");
    }

    #[test]
    fn read_error_mentions_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/p/cotton.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "cannot read /p/cotton.toml: gone");
    }
}
