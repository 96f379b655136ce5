//! Directory-backed loader that compiles cotton templates on demand.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cotton_cache::{FileStore, TemplateCache};
use cotton_common::Mtime;
use cotton_compiler::{CompilerOptions, CottonCompiler};
use cotton_config::{resolve_cache_path, resolve_dirs, CacheBackend, CottonConfig};
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::origin::{safe_join, Origin};

/// A loaded template: where it came from and its compiled text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    /// The origin the template was read from.
    pub origin: Origin,
    /// The compiled template text.
    pub contents: String,
}

/// Resolves template names against search directories, compiles sources
/// that use cotton syntax and caches the result keyed by name and mtime.
#[derive(Debug)]
pub struct Loader {
    dirs: Vec<PathBuf>,
    compiler: CottonCompiler,
    cache: TemplateCache,
}

impl Loader {
    /// Creates a loader over `dirs`, searched in order.
    pub fn new(dirs: Vec<PathBuf>, compiler: CottonCompiler, cache: TemplateCache) -> Self {
        Self {
            dirs,
            compiler,
            cache,
        }
    }

    /// Builds a loader from configuration, resolving relative paths against
    /// `base`.
    pub fn from_config(config: &CottonConfig, base: &Path) -> Self {
        let compiler = CottonCompiler::new(CompilerOptions {
            cotton_dir: config.compiler.dir.clone(),
        });
        let cache = if !config.cache.enabled {
            TemplateCache::disabled()
        } else {
            match config.cache.backend {
                CacheBackend::Memory => TemplateCache::in_memory(),
                CacheBackend::File => {
                    let store = FileStore::new(&resolve_cache_path(config, base));
                    TemplateCache::new(true, Arc::new(store))
                }
            }
        };
        Self::new(resolve_dirs(config, base), compiler, cache)
    }

    /// Returns the search directories.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Returns the compiler.
    pub fn compiler(&self) -> &CottonCompiler {
        &self.compiler
    }

    /// Returns the template cache.
    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Yields one origin per search directory that `template_name` can be
    /// joined onto without escaping it.
    pub fn template_sources<'a>(
        &'a self,
        template_name: &'a str,
    ) -> impl Iterator<Item = Origin> + 'a {
        self.dirs.iter().filter_map(move |dir| {
            let name = safe_join(dir, template_name)?;
            Some(Origin {
                name,
                template_name: template_name.to_string(),
            })
        })
    }

    /// Returns the compiled contents of `origin`.
    ///
    /// A cached value for the current mtime is returned without reading the
    /// file. Cache write failures are logged and do not fail the load.
    pub fn get_contents(&self, origin: &Origin) -> Result<String, LoadError> {
        let mtime = Mtime::of_file(&origin.name).map_err(|e| not_found_or_io(origin, e))?;
        let key = self.cache.key(&origin.template_name, mtime);

        if let Some(cached) = self.cache.get(&key) {
            debug!(template = %origin.template_name, %key, "cache hit");
            return Ok(cached);
        }

        let source =
            std::fs::read_to_string(&origin.name).map_err(|e| not_found_or_io(origin, e))?;
        if !CottonCompiler::is_applicable(&source) {
            return Err(LoadError::NotApplicable {
                name: origin.template_name.clone(),
            });
        }

        let compiled = self.compiler.process(&source, &origin.template_name);
        if let Err(err) = self.cache.store(&key, &compiled) {
            warn!(template = %origin.template_name, error = %err, "failed to cache compiled template");
        }
        Ok(compiled)
    }

    /// Loads `template_name` from the first directory that has it.
    ///
    /// Origins that are missing or hold a plain template are skipped. If none
    /// succeeds the error is `NotApplicable` when some origin held a plain
    /// template, otherwise `SourceUnavailable`.
    pub fn get_template(&self, template_name: &str) -> Result<LoadedTemplate, LoadError> {
        let mut plain = false;
        for origin in self.template_sources(template_name) {
            match self.get_contents(&origin) {
                Ok(contents) => return Ok(LoadedTemplate { origin, contents }),
                Err(LoadError::SourceUnavailable { .. }) => {}
                Err(LoadError::NotApplicable { .. }) => plain = true,
                Err(err) => return Err(err),
            }
        }
        let name = template_name.to_string();
        if plain {
            Err(LoadError::NotApplicable { name })
        } else {
            Err(LoadError::SourceUnavailable { name })
        }
    }
}

fn not_found_or_io(origin: &Origin, err: io::Error) -> LoadError {
    if err.kind() == io::ErrorKind::NotFound {
        LoadError::SourceUnavailable {
            name: origin.name.display().to_string(),
        }
    } else {
        LoadError::Io {
            path: origin.name.clone(),
            source: err,
        }
    }
}
