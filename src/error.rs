//! Error taxonomy for a generation run.
//!
//! Fatal errors abort the run and map to exit status 1. `MetadataRead` and
//! `AssetCopy` are never returned from the top-level pipeline; they are
//! logged as warnings where they happen.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    /// A named input file does not exist.
    #[error("no such file: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// An input file exists but could not be read while rendering.
    #[error("failed to read {}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A companion or combined glob file is missing or unreadable.
    #[error("cannot read glob file {}", path.display())]
    MetadataRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A static support file is missing from the assets directory.
    #[error("cannot copy asset {}", path.display())]
    AssetCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output stream could not be opened, written or flushed.
    #[error("failed to write {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type DocResult<T> = Result<T, DocError>;
