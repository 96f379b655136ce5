//! Cache entry errors.

use std::path::PathBuf;

/// Why a cache entry could not be read or written.
///
/// [`crate::CacheStore::get`] turns every one of these into a miss;
/// writes hand them back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading, writing or listing the cache directory failed.
    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The entry does not start with a usable header.
    #[error("malformed cache entry {}: {reason}", path.display())]
    BadHeader {
        /// The entry file.
        path: PathBuf,
        /// What is wrong with the header.
        reason: String,
    },

    /// The entry was written in a different on-disk format.
    #[error("cache entry {} has format version {found}", path.display())]
    FormatVersion {
        /// The entry file.
        path: PathBuf,
        /// The version stored in the header.
        found: u32,
    },

    /// The compiled text no longer matches the checksum in the header.
    #[error("cache entry {} is corrupt: checksum {actual}, header says {expected}", path.display())]
    Checksum {
        /// The entry file.
        path: PathBuf,
        /// Checksum recorded in the header.
        expected: String,
        /// Checksum of the payload as read.
        actual: String,
    },

    /// The header could not be encoded or decoded, or the payload is not UTF-8.
    #[error("cache entry encoding failed: {0}")]
    Encoding(String),
}
