//! Cache keys for compiled templates.

use std::fmt;

use cotton_common::{IdentityDigest, Mtime};

/// Version of the compiled-output contract.
///
/// Embedded in every cache key; bump it when compiled output from an older
/// release would no longer render correctly, so that stale entries are
/// never read again.
pub const COMPILER_VERSION: &str = "2";

const KEY_PREFIX: &str = "cotton_cache_v";

/// Key under which a compiled template is cached:
/// `cotton_cache_v<version>_<sha256 of identity>_<mtime>`.
///
/// Any change to the source file's modification time yields a new key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a template identity and its modification time.
    pub fn new(identity: &str, mtime: Mtime) -> Self {
        let digest = IdentityDigest::of(identity);
        Self(format!("{KEY_PREFIX}{COMPILER_VERSION}_{digest}_{mtime}"))
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The key without its trailing mtime: equal for every version of one
/// template. Keys not built by [`CacheKey`] are their own stem.
pub(crate) fn key_stem(key: &str) -> &str {
    match key.rsplit_once('_') {
        Some((stem, _)) if key.starts_with(KEY_PREFIX) => stem,
        _ => key,
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
