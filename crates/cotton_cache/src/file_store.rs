//! File-backed store for compiled templates.
//!
//! Each entry is one file under the cache directory. A file starts with a
//! header carrying magic bytes, the entry format version, the compiler
//! version and a checksum of the payload; the payload is the compiled text.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cotton_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::key::COMPILER_VERSION;
use crate::store::CacheStore;

/// Magic bytes identifying a cotton cache entry.
const ENTRY_MAGIC: [u8; 4] = *b"CTTN";

/// Current entry format version. Increment on breaking changes to the
/// header or payload format.
const ENTRY_FORMAT_VERSION: u32 = 1;

/// File extension of cache entries.
const ENTRY_EXT: &str = "cache";

/// Header prepended to every cache entry for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryHeader {
    /// Magic bytes: must be `b"CTTN"`.
    pub magic: [u8; 4],

    /// Entry format version.
    pub format_version: u32,

    /// Compiler version that produced the payload.
    pub compiler_version: String,

    /// Expiry in whole seconds since the Unix epoch, `None` for no expiry.
    pub expires_at: Option<u64>,

    /// Content hash of the payload.
    pub checksum: ContentHash,
}

/// Store keeping one file per key under a directory.
///
/// Writes go to a temporary file that is renamed into place, so concurrent
/// writers of one key never leave a partial entry. Reads are fail-safe:
/// missing, corrupt, expired or mismatched entries are misses.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Returns the root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path for `key`.
    ///
    /// Keys made only of ASCII alphanumerics, `_`, `-` and `.` are used as
    /// file names directly; any other key is replaced by its content hash.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let safe = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        let stem = if safe {
            key.to_string()
        } else {
            ContentHash::of(key.as_bytes()).to_string()
        };
        self.dir.join(format!("{stem}.{ENTRY_EXT}"))
    }

    /// Reads and validates the entry for `key`.
    ///
    /// Returns `Ok(None)` if there is no entry or it has expired.
    pub fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(key);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io { path, source: e }),
        };

        let invalid = |reason: &str| CacheError::BadHeader {
            path: path.clone(),
            reason: reason.to_string(),
        };

        if raw.len() < 4 {
            return Err(invalid("file shorter than header length"));
        }
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&raw[..4]);
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        if raw.len() < 4 + header_len {
            return Err(invalid("truncated header"));
        }

        let (header, _): (EntryHeader, usize) =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .map_err(|e| CacheError::Encoding(e.to_string()))?;

        if header.magic != ENTRY_MAGIC {
            return Err(invalid("missing magic bytes"));
        }
        if header.format_version != ENTRY_FORMAT_VERSION {
            return Err(CacheError::FormatVersion {
                path: path.clone(),
                found: header.format_version,
            });
        }
        if header.compiler_version != COMPILER_VERSION {
            return Err(invalid(&format!(
                "written by compiler version {}",
                header.compiler_version
            )));
        }

        let payload = &raw[4 + header_len..];
        let actual = ContentHash::of(payload);
        if actual != header.checksum {
            return Err(CacheError::Checksum {
                path: path.clone(),
                expected: header.checksum.to_string(),
                actual: actual.to_string(),
            });
        }

        if header.expires_at.is_some_and(|at| epoch_secs() >= at) {
            return Ok(None);
        }

        String::from_utf8(payload.to_vec())
            .map(Some)
            .map_err(|e| CacheError::Encoding(e.to_string()))
    }

    /// Writes the entry for `key` atomically.
    pub fn write(&self, key: &str, value: &str, timeout: Option<Duration>) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let data = value.as_bytes();
        let header = EntryHeader {
            magic: ENTRY_MAGIC,
            format_version: ENTRY_FORMAT_VERSION,
            compiler_version: COMPILER_VERSION.to_string(),
            expires_at: timeout.map(|t| epoch_secs().saturating_add(t.as_secs())),
            checksum: ContentHash::of(data),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Encoding(e.to_string()))?;

        // u32 LE header length, header, payload
        let mut entry = (header_bytes.len() as u32).to_le_bytes().to_vec();
        entry.extend(header_bytes);
        entry.extend_from_slice(data);

        let path = self.entry_path(key);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        tmp.write_all(&entry).map_err(|e| CacheError::Io {
            path: tmp.path().to_path_buf(),
            source: e,
        })?;
        tmp.persist(&path).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        Ok(())
    }

    /// Removes every entry file and returns how many were removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let entries = std::fs::read_dir(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXT) {
                std::fs::remove_file(&path).map_err(|e| CacheError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "treating unreadable cache entry as a miss");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str, timeout: Option<Duration>) -> Result<(), CacheError> {
        self.write(key, value, timeout)
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
