//! Template origins and safe path joining.

use std::path::{Component, Path, PathBuf};

/// Where a template may be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Absolute or project-relative path of the template file.
    pub name: PathBuf,
    /// The logical template name, used as the template identity.
    pub template_name: String,
}

/// Joins `name` onto `base`, refusing any result outside `base`.
///
/// Absolute names and names whose `..` components climb above `base` yield
/// `None`; `..` that stays inside (`a/../b.html`) is resolved lexically.
pub fn safe_join(base: &Path, name: &str) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    let mut joined = base.to_path_buf();
    joined.extend(parts);
    Some(joined)
}
