//! Resolution of permission-entry path specifiers.
//!
//! Specifiers use the syntax Claude Code itself writes into settings files:
//! `//x` is an absolute path, `~/x` is relative to the home directory, and
//! everything else (including a single leading `/`) is relative to the
//! settings file's base directory.

use std::path::{
    Component,
    Path,
    PathBuf,
};

/// Directories a specifier may be resolved against.
///
/// Either may be absent: `home` when the host has no home directory, `base`
/// for user-scope settings files, which have no project root.
#[derive(Debug, Clone, Default)]
pub struct ResolveDirs {
    pub home: Option<PathBuf>,
    pub base: Option<PathBuf>,
}

impl ResolveDirs {
    pub fn new(home: Option<PathBuf>, base: Option<PathBuf>) -> Self {
        Self { home, base }
    }
}

/// Resolves a specifier to an absolute path, first match wins:
///
/// - `//x` drops one leading `/`;
/// - `~/x` joins the home directory with the remainder;
/// - anything else joins the base directory with the specifier as-is.
///
/// Returns `None` when the required directory is absent; callers must keep
/// the entry in that case.
pub fn resolve_specifier(specifier: &str, dirs: &ResolveDirs) -> Option<PathBuf> {
    if let Some(rest) = specifier.strip_prefix("//") {
        return Some(normalize(Path::new(&format!("/{rest}"))));
    }
    if let Some(rest) = specifier.strip_prefix("~/") {
        let home = dirs.home.as_deref()?;
        return Some(normalize(&home.join(rest)));
    }
    let base = dirs.base.as_deref()?;
    // A leading `/` is part of the relative remainder here, not a filesystem
    // root, so it must not replace `base` on join.
    Some(normalize(&base.join(specifier.trim_start_matches('/'))))
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// A `..` that would climb past the first component is dropped rather than
/// applied.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            },
            c => components.push(c),
        }
    }
    components.iter().collect()
}
