//! Input classification: existing path + resolved module name.

use crate::error::{DocError, DocResult};
use crate::paths::PathMapper;
use std::path::{Path, PathBuf};

/// One input file tagged with its logical module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub module: String,
}

impl SourceUnit {
    /// Path of the companion glob file (`foo/Bar.v` → `foo/Bar.glob`).
    pub fn glob_path(&self) -> PathBuf {
        self.path.with_extension("glob")
    }
}

/// Accept any existing path; no extension or content checks.
pub fn classify(path: &Path, mapper: &PathMapper) -> DocResult<SourceUnit> {
    if !path.exists() {
        return Err(DocError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(SourceUnit {
        path: path.to_path_buf(),
        module: mapper.resolve(path),
    })
}

/// Classify every argument in order, failing on the first missing file.
pub fn classify_all(paths: &[PathBuf], mapper: &PathMapper) -> DocResult<Vec<SourceUnit>> {
    paths.iter().map(|p| classify(p, mapper)).collect()
}
