//! Run configuration assembled from the command line.

use clap::ValueEnum;
use std::path::PathBuf;

/// Output target, selecting both the backend and the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TargetFormat {
    /// Plain HTML pages.
    Html,
    /// HTML pages whose code blocks are made interactive by jsCoq.
    #[default]
    #[value(name = "jscoq")]
    JsCoq,
    /// Plain-text trace of the block structure, for debugging.
    Debug,
}

impl TargetFormat {
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Html | Self::JsCoq => "html",
            Self::Debug => "txt",
        }
    }
}

/// Where rendered documents go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Stdout,
    SingleFile(PathBuf),
    MultiFile,
}

/// Where cross-reference metadata is read from before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobSource {
    None,
    PerUnit,
    Combined(PathBuf),
}

/// Document-shape options. Read-only once parsing is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub table_of_contents: bool,
    pub index: bool,
    pub split_index: bool,
    pub standalone: bool,
    pub toc_depth: Option<u8>,
    pub title: String,
    pub short_titles: bool,
    pub light: bool,
    pub index_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            table_of_contents: false,
            index: true,
            split_index: false,
            standalone: true,
            toc_depth: None,
            title: String::new(),
            short_titles: false,
            light: false,
            index_name: "index".to_string(),
        }
    }
}

impl RenderOptions {
    /// Flags for one whole-run document: everything honored as given.
    pub fn document_flags(&self) -> DocumentFlags {
        DocumentFlags {
            toc: self.table_of_contents,
            index: self.index,
            split_index: self.split_index,
            standalone: self.standalone,
        }
    }

    /// Flags for a per-unit document: no global TOC or index.
    pub fn per_unit_flags(&self) -> DocumentFlags {
        DocumentFlags {
            toc: false,
            index: false,
            split_index: false,
            standalone: self.standalone,
        }
    }
}

/// The four switches a backend sees when a document starts or the
/// appendix is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentFlags {
    pub toc: bool,
    pub index: bool,
    pub split_index: bool,
    pub standalone: bool,
}
