//! `cotton build`: compile every template under the loader directories.
//!
//! Templates are discovered up front, then compiled in parallel. By default
//! the results go into the configured cache; with `--out` the template tree
//! is mirrored into a directory, plain templates copied unchanged.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use cotton_loader::{LoadError, Loader, Origin};
use rayon::prelude::*;
use tracing::{debug, error, warn};

use crate::project::load_project;
use crate::{BuildArgs, GlobalArgs};

/// File extension of templates picked up by the build.
const TEMPLATE_EXT: &str = "html";

/// What happened to one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Compiled,
    Plain,
    Failed,
}

/// Totals reported at the end of a build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Templates that used cotton syntax and were compiled.
    pub compiled: usize,
    /// Templates without cotton syntax.
    pub plain: usize,
    /// Templates that could not be read or written.
    pub failed: usize,
}

/// Runs the `cotton build` command.
///
/// Returns exit code 1 if any template failed.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (base, config) = load_project(global)?;
    let loader = Loader::from_config(&config, &base);

    if loader.dirs().is_empty() {
        if !global.quiet {
            eprintln!("warning: no template directories configured in [loader] dirs");
        }
        return Ok(0);
    }

    let out = args.out.as_ref().map(PathBuf::from);
    let summary = build(&loader, out.as_deref())?;

    if !global.quiet {
        eprintln!(
            "   Built {} template(s), {} plain, {} failed",
            summary.compiled, summary.plain, summary.failed
        );
    }
    Ok(if summary.failed > 0 { 1 } else { 0 })
}

/// Compiles every template the loader can see.
///
/// A name present in several directories is taken from the first one, the
/// same way the loader resolves it.
pub fn build(loader: &Loader, out: Option<&Path>) -> Result<BuildSummary, Box<dyn std::error::Error>> {
    let origins = discover_origins(loader.dirs())?;
    debug!(count = origins.len(), "discovered templates");

    let outcomes: Vec<Outcome> = origins
        .par_iter()
        .map(|origin| build_one(loader, origin, out))
        .collect();

    let mut summary = BuildSummary::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Compiled => summary.compiled += 1,
            Outcome::Plain => summary.plain += 1,
            Outcome::Failed => summary.failed += 1,
        }
    }
    Ok(summary)
}

fn build_one(loader: &Loader, origin: &Origin, out: Option<&Path>) -> Outcome {
    let (contents, outcome) = match loader.get_contents(origin) {
        Ok(compiled) => (Some(compiled), Outcome::Compiled),
        Err(LoadError::NotApplicable { .. }) => (None, Outcome::Plain),
        Err(e) => {
            error!(template = %origin.template_name, error = %e, "failed to compile");
            return Outcome::Failed;
        }
    };

    let Some(out) = out else {
        return outcome;
    };
    let target = out.join(&origin.template_name);
    let written = target
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| match contents {
            Some(ref compiled) => std::fs::write(&target, compiled),
            None => std::fs::copy(&origin.name, &target).map(|_| ()),
        });
    match written {
        Ok(()) => outcome,
        Err(e) => {
            warn!(target = %target.display(), error = %e, "failed to write template");
            Outcome::Failed
        }
    }
}

/// Lists `.html` files under each directory as origins named by their
/// `/`-separated path relative to that directory, sorted per directory.
pub fn discover_origins(dirs: &[PathBuf]) -> Result<Vec<Origin>, Box<dyn std::error::Error>> {
    let mut seen = HashSet::new();
    let mut origins = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "template directory does not exist");
            continue;
        }
        let mut files = Vec::new();
        walk_dir(dir, &mut files)?;
        files.sort();
        for path in files {
            let Some(template_name) = relative_name(dir, &path) else {
                continue;
            };
            if seen.insert(template_name.clone()) {
                origins.push(Origin {
                    name: path,
                    template_name,
                });
            }
        }
    }
    Ok(origins)
}

/// Recursively walks a directory collecting template files.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(TEMPLATE_EXT) {
            files.push(path);
        }
    }
    Ok(())
}

fn relative_name(dir: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(dir).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}
