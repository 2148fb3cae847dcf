//! Debug backend, a plain-text trace of blocks and resolved references.

use crate::config::{DocumentFlags, TargetFormat};
use crate::error::DocResult;
use crate::literate::{self, Block, CodePiece};
use crate::render::{Backend, OutputDir, RenderContext};
use crate::source::SourceUnit;
use std::io::{self, Write};

#[derive(Debug, Default)]
pub struct DebugBackend {
    rendered: Vec<String>,
}

impl Backend for DebugBackend {
    fn format(&self) -> TargetFormat {
        TargetFormat::Debug
    }

    fn start_document(
        &mut self,
        out: &mut dyn Write,
        title: &str,
        flags: DocumentFlags,
        _ctx: &RenderContext,
    ) -> io::Result<()> {
        writeln!(
            out,
            "document {:?} toc={} index={} split_index={} standalone={}",
            title, flags.toc, flags.index, flags.split_index, flags.standalone
        )
    }

    fn render_unit(
        &mut self,
        out: &mut dyn Write,
        unit: &SourceUnit,
        text: &str,
        ctx: &RenderContext,
    ) -> io::Result<()> {
        writeln!(out, "unit {} ({})", unit.module, unit.path.display())?;
        for block in literate::parse(text, ctx.options.light) {
            match block {
                Block::Heading { level, text } => writeln!(out, "  heading {} {:?}", level, text)?,
                Block::Doc(text) => writeln!(out, "  doc {:?}", text)?,
                Block::Code { offset, text } => {
                    writeln!(out, "  code @{} {:?}", offset, text)?;
                    for piece in literate::annotate(&text, offset, &unit.module, ctx.index) {
                        match piece {
                            CodePiece::Text(_) => {}
                            CodePiece::Ref {
                                text,
                                offset,
                                target,
                            } => {
                                let link = ctx
                                    .index
                                    .resolve_link(&target.module, &target.name, ctx.link_style)
                                    .unwrap_or_else(|| "unresolved".to_string());
                                writeln!(
                                    out,
                                    "    ref {:?} @{}-{} -> {}",
                                    text, offset, target.end, link
                                )?;
                            }
                            CodePiece::Def { text, offset, def } => {
                                writeln!(out, "    def {:?} @{}-{} {}", text, offset, def.end, def.kind)?;
                            }
                        }
                    }
                }
            }
        }
        self.rendered.push(unit.module.clone());
        Ok(())
    }

    fn end_document(&mut self, out: &mut dyn Write, _ctx: &RenderContext) -> io::Result<()> {
        writeln!(out, "end")
    }

    fn appendix(
        &mut self,
        dir: &OutputDir,
        flags: DocumentFlags,
        ctx: &RenderContext,
    ) -> DocResult<()> {
        let ext = self.file_extension();
        if flags.toc {
            dir.write_file(&format!("toc.{}", ext), |out| {
                for module in &self.rendered {
                    writeln!(out, "{}", module)?;
                }
                Ok(())
            })?;
        }
        if flags.index {
            dir.write_file(&format!("{}.{}", ctx.options.index_name, ext), |out| {
                for def in ctx.index.alphabetic_entries() {
                    writeln!(out, "{} {} {}@{}", def.name, def.kind, def.module, def.start)?;
                }
                Ok(())
            })?;
        }
        Ok(())
    }

    fn static_assets(&self) -> &'static [&'static str] {
        &[]
    }
}
