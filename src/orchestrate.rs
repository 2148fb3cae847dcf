//! Document production: one consolidated document or one per unit.
//!
//! Units are rendered strictly in the order given. Every input is read before
//! the first output is opened. An output error stops the run at once; files
//! already written in multi-file mode are left in place.

use crate::config::{DocumentFlags, OutputMode, RenderOptions, TargetFormat};
use crate::error::{DocError, DocResult};
use crate::index::{CrossRefIndex, LinkStyle};
use crate::render::{Backend, OutputDir, RenderContext};
use crate::source::SourceUnit;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where documents and support assets go.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub mode: OutputMode,
    /// Directory for per-unit documents and the appendix.
    pub output_dir: PathBuf,
    /// Directory holding the backend's static assets.
    pub assets_dir: PathBuf,
}

/// File name of the per-unit document for `module`.
pub fn derive_output_name(module: &str, format: TargetFormat) -> String {
    format!("{}.{}", module, format.file_extension())
}

pub fn produce(
    backend: &mut dyn Backend,
    units: &[SourceUnit],
    plan: &OutputPlan,
    options: &RenderOptions,
    index: &CrossRefIndex,
) -> DocResult<()> {
    let sources = read_sources(units)?;
    match &plan.mode {
        OutputMode::Stdout => {
            let ctx = single_context(options, index);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            render_document(
                backend,
                &mut out,
                Path::new("<stdout>"),
                &document_title(options, None),
                options.document_flags(),
                &sources,
                &ctx,
            )
        }
        OutputMode::SingleFile(path) => {
            let ctx = single_context(options, index);
            let file = File::create(path).map_err(|source| DocError::OutputWrite {
                path: path.clone(),
                source,
            })?;
            let mut out = BufWriter::new(file);
            render_document(
                backend,
                &mut out,
                path,
                &document_title(options, None),
                options.document_flags(),
                &sources,
                &ctx,
            )?;
            let dest = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            copy_assets(backend.static_assets(), &plan.assets_dir, dest);
            Ok(())
        }
        OutputMode::MultiFile => produce_multi(backend, &sources, plan, options, index),
    }
}

fn produce_multi(
    backend: &mut dyn Backend,
    sources: &[Source],
    plan: &OutputPlan,
    options: &RenderOptions,
    index: &CrossRefIndex,
) -> DocResult<()> {
    let format = backend.format();
    let ctx = RenderContext {
        options,
        index,
        link_style: LinkStyle::PerModule {
            extension: format.file_extension(),
        },
    };

    fs::create_dir_all(&plan.output_dir).map_err(|source| DocError::OutputWrite {
        path: plan.output_dir.clone(),
        source,
    })?;
    let dir = OutputDir::new(&plan.output_dir);

    for source in sources {
        let module = source.0.module.as_str();
        let name = derive_output_name(module, format);
        let (path, mut out) = dir.create(&name)?;
        render_document(
            backend,
            &mut out,
            &path,
            &document_title(options, Some(module)),
            options.per_unit_flags(),
            std::slice::from_ref(source),
            &ctx,
        )?;
    }

    backend.appendix(&dir, options.document_flags(), &ctx)?;
    copy_assets(backend.static_assets(), &plan.assets_dir, &plan.output_dir);
    Ok(())
}

fn single_context<'a>(options: &'a RenderOptions, index: &'a CrossRefIndex) -> RenderContext<'a> {
    RenderContext {
        options,
        index,
        link_style: LinkStyle::SameDocument,
    }
}

fn document_title(options: &RenderOptions, module: Option<&str>) -> String {
    if !options.title.is_empty() {
        return options.title.clone();
    }
    module.unwrap_or("Documentation").to_string()
}

/// A unit paired with its text.
type Source<'a> = (&'a SourceUnit, String);

/// Text of every unit, in order. The first unreadable input aborts the run.
fn read_sources(units: &[SourceUnit]) -> DocResult<Vec<Source<'_>>> {
    units
        .iter()
        .map(|unit| match fs::read_to_string(&unit.path) {
            Ok(text) => Ok((unit, text)),
            Err(source) => Err(DocError::InputRead {
                path: unit.path.clone(),
                source,
            }),
        })
        .collect()
}

/// start → render each unit → end → flush, on one stream.
fn render_document(
    backend: &mut dyn Backend,
    out: &mut dyn Write,
    out_path: &Path,
    title: &str,
    flags: DocumentFlags,
    sources: &[Source],
    ctx: &RenderContext,
) -> DocResult<()> {
    let wrap = |source| DocError::OutputWrite {
        path: out_path.to_path_buf(),
        source,
    };

    backend.start_document(out, title, flags, ctx).map_err(wrap)?;
    for (unit, text) in sources {
        tracing::debug!(module = %unit.module, "rendering");
        backend.render_unit(out, unit, text, ctx).map_err(wrap)?;
    }
    backend.end_document(out, ctx).map_err(wrap)?;
    out.flush().map_err(wrap)
}

/// Copy support files into `dest`. Missing files only produce warnings.
pub fn copy_assets(assets: &[&str], assets_dir: &Path, dest: &Path) {
    for name in assets {
        let from = assets_dir.join(name);
        let to = dest.join(name);
        if from == to {
            continue;
        }
        if let Err(source) = fs::copy(&from, &to) {
            let err = DocError::AssetCopy { path: from, source };
            tracing::warn!("{err}; continuing without it");
        }
    }
}
