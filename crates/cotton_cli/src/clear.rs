//! `cotton clear`: empty the file cache.

use cotton_cache::FileStore;
use cotton_config::{resolve_cache_path, CacheBackend};
use tracing::info;

use crate::project::load_project;
use crate::GlobalArgs;

/// Runs the `cotton clear` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (base, config) = load_project(global)?;
    if config.cache.backend != CacheBackend::File {
        info!("memory cache is per process; nothing to clear");
    }
    let store = FileStore::new(&resolve_cache_path(&config, &base));
    let removed = store.clear()?;
    if !global.quiet {
        eprintln!("   Removed {removed} cache entr{}", if removed == 1 { "y" } else { "ies" });
    }
    Ok(0)
}
