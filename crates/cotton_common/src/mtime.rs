//! File modification times as they appear in cache keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// A file modification time in fractional seconds since the Unix epoch.
///
/// Displayed the way cache keys expect it: the shortest decimal form of the
/// value, always with a fractional part (`1700000000.0`, `1700000000.25`).
/// Times before the epoch clamp to zero.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Mtime(f64);

impl Mtime {
    /// Creates a modification time from fractional epoch seconds.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self(secs.max(0.0))
    }

    /// Converts a [`SystemTime`] into a modification time.
    pub fn from_system_time(time: SystemTime) -> Self {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self(secs)
    }

    /// Reads the modification time of the file at `path`.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let modified = std::fs::metadata(path)?.modified()?;
        Ok(Self::from_system_time(modified))
    }

    /// Returns the value in fractional epoch seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Mtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for Mtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mtime({self})")
    }
}
