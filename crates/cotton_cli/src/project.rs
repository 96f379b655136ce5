//! Project root and configuration discovery shared by the commands.

use std::path::{Path, PathBuf};

use cotton_config::{load_config_file, CottonConfig, CONFIG_FILE_NAME};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `cotton.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the project configuration and the directory it is relative to.
///
/// `--config` names a file (its parent is the base) or a directory holding
/// `cotton.toml`. Without it the nearest `cotton.toml` above the working
/// directory is used, and with none found the defaults apply relative to
/// the working directory.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, CottonConfig), Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        let (base, file) = if p.is_dir() {
            let file = p.join(CONFIG_FILE_NAME);
            (p, file)
        } else {
            let base = p
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (base, p)
        };
        let config = load_config_file(&file)?;
        return Ok((base, config));
    }

    let cwd = std::env::current_dir()?;
    match find_project_root(&cwd) {
        Some(root) => {
            let config = load_config_file(&root.join(CONFIG_FILE_NAME))?;
            Ok((root, config))
        }
        None => Ok((cwd, CottonConfig::default())),
    }
}
