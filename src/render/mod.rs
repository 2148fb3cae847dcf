//! Backends: trait-based format dispatch.
//!
//! A backend is selected once per run and driven by the orchestrator:
//! `start_document`, `render_unit` for each unit, `end_document`, and in
//! multi-file mode a final `appendix`. Backends never open input files;
//! unit text is handed to them already read.

pub mod debug;
pub mod html;
pub mod jscoq;

use crate::config::{DocumentFlags, RenderOptions, TargetFormat};
use crate::error::{DocError, DocResult};
use crate::index::{CrossRefIndex, LinkStyle};
use crate::source::SourceUnit;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Read-only state every render call sees.
pub struct RenderContext<'a> {
    pub options: &'a RenderOptions,
    pub index: &'a CrossRefIndex,
    pub link_style: LinkStyle,
}

pub trait Backend {
    fn format(&self) -> TargetFormat;

    fn start_document(
        &mut self,
        out: &mut dyn Write,
        title: &str,
        flags: DocumentFlags,
        ctx: &RenderContext,
    ) -> io::Result<()>;

    fn render_unit(
        &mut self,
        out: &mut dyn Write,
        unit: &SourceUnit,
        text: &str,
        ctx: &RenderContext,
    ) -> io::Result<()>;

    fn end_document(&mut self, out: &mut dyn Write, ctx: &RenderContext) -> io::Result<()>;

    /// Consolidated TOC and index pages written after every per-unit
    /// document exists.
    fn appendix(
        &mut self,
        dir: &OutputDir,
        flags: DocumentFlags,
        ctx: &RenderContext,
    ) -> DocResult<()>;

    /// Support files to copy next to the generated documents.
    fn static_assets(&self) -> &'static [&'static str];

    fn file_extension(&self) -> &'static str {
        self.format().file_extension()
    }
}

/// Pick the backend for `format`.
pub fn select(format: TargetFormat) -> Box<dyn Backend> {
    match format {
        TargetFormat::Html => Box::new(html::HtmlBackend::new(html::Flavor::Plain)),
        TargetFormat::JsCoq => Box::new(html::HtmlBackend::new(html::Flavor::JsCoq)),
        TargetFormat::Debug => Box::new(debug::DebugBackend::default()),
    }
}

/// Directory receiving generated files.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create (or truncate) `name` for buffered writing.
    pub fn create(&self, name: &str) -> DocResult<(PathBuf, BufWriter<File>)> {
        let path = self.root.join(name);
        match File::create(&path) {
            Ok(file) => Ok((path, BufWriter::new(file))),
            Err(source) => Err(DocError::OutputWrite { path, source }),
        }
    }

    /// Create `name`, fill it with `body`, and flush it. Any I/O failure is
    /// reported as an output error for that file.
    pub fn write_file<F>(&self, name: &str, body: F) -> DocResult<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let (path, mut out) = self.create(name)?;
        let wrap = |source| DocError::OutputWrite {
            path: path.clone(),
            source,
        };
        body(&mut out).map_err(wrap)?;
        out.flush().map_err(wrap)?;
        tracing::debug!(path = %path.display(), "wrote");
        Ok(())
    }
}

/// Minimal HTML escaping for text and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
