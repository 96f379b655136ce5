//! Resolution of configured paths against the project directory.

use crate::types::CottonConfig;
use std::path::{Path, PathBuf};

/// Resolves the configured template search directories.
///
/// Relative entries are joined onto `base` (the directory holding
/// `cotton.toml`); absolute entries are kept as written. Order is preserved,
/// and the first directory wins when a template exists in several.
pub fn resolve_dirs(config: &CottonConfig, base: &Path) -> Vec<PathBuf> {
    config
        .loader
        .dirs
        .iter()
        .map(|d| {
            let p = Path::new(d);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        })
        .collect()
}

/// Resolves the file cache directory against `base`.
pub fn resolve_cache_path(config: &CottonConfig, base: &Path) -> PathBuf {
    let p = Path::new(&config.cache.path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn relative_dirs_join_base() {
        let config = load_config_from_str("[loader]\ndirs = [\"templates\", \"more\"]\n").unwrap();
        let dirs = resolve_dirs(&config, Path::new("/srv/site"));
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/srv/site/templates"),
                PathBuf::from("/srv/site/more")
            ]
        );
    }

    #[test]
    fn absolute_dirs_kept() {
        let config = load_config_from_str("[loader]\ndirs = \"/opt/templates\"\n").unwrap();
        let dirs = resolve_dirs(&config, Path::new("/srv/site"));
        assert_eq!(dirs, vec![PathBuf::from("/opt/templates")]);
    }

    #[test]
    fn no_dirs_resolves_empty() {
        let config = load_config_from_str("").unwrap();
        assert!(resolve_dirs(&config, Path::new("/srv/site")).is_empty());
    }

    #[test]
    fn cache_path_default_is_under_base() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(
            resolve_cache_path(&config, Path::new("/srv/site")),
            PathBuf::from("/srv/site/.cotton-cache")
        );
    }
}
