//! Configuration types deserialized from `cotton.toml`.

use serde::{Deserialize, Deserializer};

pub use cotton_common::DEFAULT_COTTON_DIR;

/// Default directory for the file-backed cache.
pub const DEFAULT_CACHE_PATH: &str = ".cotton-cache";

/// The top-level configuration parsed from `cotton.toml`.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct CottonConfig {
    /// Compiler settings (component base directory).
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Template search directories.
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Compiled-template cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Settings that affect the compiled output.
#[derive(Debug, Deserialize)]
pub struct CompilerConfig {
    /// Base directory for component templates: `<c-card>` compiles to
    /// `<dir>/card.html`.
    #[serde(default = "default_cotton_dir")]
    pub dir: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dir: default_cotton_dir(),
        }
    }
}

fn default_cotton_dir() -> String {
    DEFAULT_COTTON_DIR.to_string()
}

/// Template search directories, tried in order.
#[derive(Debug, Default, Deserialize)]
pub struct LoaderConfig {
    /// Directories searched for templates.
    ///
    /// Accepts either a single string or a list of strings. Relative paths
    /// are resolved against the directory holding `cotton.toml`.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub dirs: Vec<String>,
}

/// `dirs = "templates"` or `dirs = ["templates", "app/templates"]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(dir) => vec![dir],
        OneOrMany::Many(dirs) => dirs,
    })
}

/// Compiled-template cache settings.
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// Whether compiled templates are cached at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Which store holds cached templates.
    #[serde(default)]
    pub backend: CacheBackend,
    /// Directory used by the file backend.
    #[serde(default = "default_cache_path")]
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::default(),
            path: default_cache_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_path() -> String {
    DEFAULT_CACHE_PATH.to_string()
}

/// Storage backend for compiled templates.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process map; entries live as long as the process.
    #[default]
    Memory,
    /// One file per entry under [`CacheConfig::path`].
    File,
}
