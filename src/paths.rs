//! Physical-to-logical path bindings (`-R`/`-Q`) and module name resolution.
//!
//! Bindings are scanned in declaration order and the first one whose
//! directory lies on the file's parent chain wins. A later, more specific
//! binding never overrides an earlier general one, so users must declare
//! nested directories first.

use std::path::{Component, Path, PathBuf};

/// One `-R dir Name` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBinding {
    pub physical: PathBuf,
    pub logical: String,
}

#[derive(Debug, Clone)]
pub struct PathMapper {
    base: PathBuf,
    bindings: Vec<PathBinding>,
}

impl Default for PathMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl PathMapper {
    /// Mapper resolving relative paths against the current directory.
    pub fn new() -> Self {
        let base = std::env::current_dir().unwrap_or_default();
        Self::with_base(base)
    }

    /// Mapper resolving relative paths against `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            bindings: Vec::new(),
        }
    }

    pub fn add_binding(&mut self, physical: impl AsRef<Path>, logical: &str) {
        let physical = normalize(&self.base, physical.as_ref());
        tracing::debug!(dir = %physical.display(), logical, "path binding");
        self.bindings.push(PathBinding {
            physical,
            logical: logical.to_string(),
        });
    }

    /// Dotted logical module name of `file`.
    pub fn resolve(&self, file: &Path) -> String {
        let stem_path = normalize(&self.base, &file.with_extension(""));

        for binding in &self.bindings {
            if let Some(name) = bind_name(binding, &stem_path) {
                return name;
            }
        }

        stem_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Walk from `stem_path` toward the root; succeed when the walk reaches the
/// binding's directory.
fn bind_name(binding: &PathBinding, stem_path: &Path) -> Option<String> {
    let mut segments = vec![stem_path.file_name()?.to_string_lossy().into_owned()];
    let mut dir = stem_path.parent();

    while let Some(d) = dir {
        if d == binding.physical {
            segments.reverse();
            let suffix = segments.join(".");
            return Some(if binding.logical.is_empty() {
                suffix
            } else {
                format!("{}.{}", binding.logical, suffix)
            });
        }
        segments.push(d.file_name()?.to_string_lossy().into_owned());
        dir = d.parent();
    }

    None
}

/// Canonical form shared by bindings and queried files: absolute against
/// `base`, `.` removed, `..` folded, repeated and trailing separators gone.
/// The filesystem is never consulted, so symlinks are not resolved.
pub fn normalize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
