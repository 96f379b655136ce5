//! `cotton key`: print the cache key of a template file.

use std::path::Path;

use cotton_cache::CacheKey;
use cotton_common::Mtime;

use crate::{GlobalArgs, KeyArgs};

/// Runs the `cotton key` command.
pub fn run(args: &KeyArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let key = key_for(Path::new(&args.file), args.name.as_deref())?;
    println!("{key}");
    Ok(0)
}

/// Derives the key for `file`, identified by `name` or by its path.
pub fn key_for(file: &Path, name: Option<&str>) -> std::io::Result<CacheKey> {
    let mtime = Mtime::of_file(file)?;
    let identity = match name {
        Some(name) => name.to_string(),
        None => file.display().to_string(),
    };
    Ok(CacheKey::new(&identity, mtime))
}
