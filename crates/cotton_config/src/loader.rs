//! Reading and checking `cotton.toml`.

use crate::error::ConfigError;
use crate::types::{CacheBackend, CottonConfig};
use std::path::{Component, Path};

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "cotton.toml";

/// Loads and validates a `cotton.toml` configuration from a project directory.
///
/// Reads `<project_dir>/cotton.toml`, parses it, and validates its values.
pub fn load_config(project_dir: &Path) -> Result<CottonConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<CottonConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates `cotton.toml` text.
pub fn load_config_from_str(content: &str) -> Result<CottonConfig, ConfigError> {
    let config: CottonConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are usable by the compiler and cache.
fn validate_config(config: &CottonConfig) -> Result<(), ConfigError> {
    let dir = config.compiler.dir.trim();
    if dir.is_empty() {
        return Err(ConfigError::Empty("compiler.dir"));
    }
    let dir_path = Path::new(dir);
    if dir_path.is_absolute() || dir.starts_with('/') {
        return Err(ConfigError::ComponentDir {
            dir: dir.to_string(),
            reason: "must be relative",
        });
    }
    if dir_path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ConfigError::ComponentDir {
            dir: dir.to_string(),
            reason: "must not contain `..`",
        });
    }
    if config.cache.backend == CacheBackend::File && config.cache.path.trim().is_empty() {
        return Err(ConfigError::Empty("cache.path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
[compiler]
dir = "components"

[loader]
dirs = ["templates", "shared/templates"]

[cache]
enabled = true
backend = "file"
path = "var/cotton"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.compiler.dir, "components");
        assert_eq!(config.loader.dirs.len(), 2);
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert_eq!(config.cache.path, "var/cotton");
    }

    #[test]
    fn nested_compiler_dir_is_allowed() {
        let toml = r#"
[compiler]
dir = "ui/components"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.compiler.dir, "ui/components");
    }

    #[test]
    fn empty_dir_errors() {
        let toml = r#"
[compiler]
dir = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Empty("compiler.dir")));
    }

    #[test]
    fn absolute_dir_errors() {
        let toml = r#"
[compiler]
dir = "/etc/cotton"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ComponentDir { .. }));
    }

    #[test]
    fn parent_dir_errors() {
        let toml = r#"
[compiler]
dir = "../outside"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ComponentDir { .. }));
    }

    #[test]
    fn file_backend_without_path_errors() {
        let toml = r#"
[cache]
backend = "file"
path = " "
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Empty("cache.path")));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let toml = "[compiler\ndir = ";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[compiler]\ndir = \"parts\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.compiler.dir, "parts");
    }

    #[test]
    fn missing_project_dir_is_a_read_error() {
        let err = load_config(Path::new("/no/such/cotton/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
