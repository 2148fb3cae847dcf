//! HTML backend, plain or with jsCoq snippets.

use crate::config::{DocumentFlags, TargetFormat};
use crate::error::DocResult;
use crate::index::{anchor, Definition, LinkStyle};
use crate::literate::{self, Block, CodePiece};
use crate::render::{html_escape, jscoq, Backend, OutputDir, RenderContext};
use crate::source::SourceUnit;
use crate::toc::{self, ModuleToc, TocEntry};
use regex::Regex;
use std::io::{self, Write};
use std::sync::LazyLock;

static RE_INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\[]+)\]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Plain,
    JsCoq,
}

pub struct HtmlBackend {
    flavor: Flavor,
    flags: Option<DocumentFlags>,
    /// Headings of the document being written.
    document_tocs: Vec<ModuleToc>,
    /// Headings of every unit rendered so far, for the appendix.
    run_tocs: Vec<ModuleToc>,
    snippets: Vec<String>,
}

impl HtmlBackend {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            flags: None,
            document_tocs: Vec::new(),
            run_tocs: Vec::new(),
            snippets: Vec::new(),
        }
    }

    fn write_header(&self, out: &mut dyn Write, title: &str) -> io::Result<()> {
        writeln!(out, "<!DOCTYPE html>\n<html>\n<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{}</title>", html_escape(title))?;
        writeln!(out, "<link rel=\"stylesheet\" href=\"coqdoc.css\">")?;
        if self.flavor == Flavor::JsCoq {
            out.write_all(jscoq::HEAD.as_bytes())?;
        }
        writeln!(out, "</head>\n<body>\n<div id=\"main\">")
    }

    fn write_footer(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "</div>")?;
        if self.flavor == Flavor::JsCoq {
            out.write_all(jscoq::start_script(&self.snippets).as_bytes())?;
        }
        writeln!(out, "</body>\n</html>")
    }

    fn write_code(
        &mut self,
        out: &mut dyn Write,
        module: &str,
        offset: usize,
        text: &str,
        ctx: &RenderContext,
    ) -> io::Result<()> {
        match self.flavor {
            Flavor::Plain => write!(out, "<div class=\"code\"><pre>")?,
            Flavor::JsCoq => {
                let id = jscoq::snippet_id(self.snippets.len());
                write!(
                    out,
                    "<div class=\"{}\" id=\"{}\"><pre>",
                    jscoq::SNIPPET_CLASS,
                    id
                )?;
                self.snippets.push(id);
            }
        }

        for piece in literate::annotate(text, offset, module, ctx.index) {
            match piece {
                CodePiece::Text(t) => out.write_all(html_escape(t).as_bytes())?,
                CodePiece::Ref { text, target, .. } => {
                    match ctx.index.resolve_link(&target.module, &target.name, ctx.link_style) {
                        Some(href) => write!(
                            out,
                            "<a class=\"idref\" title=\"{}\" href=\"{}\">{}</a>",
                            html_escape(&target.kind),
                            html_escape(&href),
                            html_escape(text)
                        )?,
                        None => out.write_all(html_escape(text).as_bytes())?,
                    }
                }
                CodePiece::Def { text, def, .. } => write!(
                    out,
                    "<a class=\"iddef\" id=\"{}\" title=\"{}\">{}</a>",
                    html_escape(&anchor(&def.module, &def.name)),
                    html_escape(&def.kind),
                    html_escape(text)
                )?,
            }
        }
        writeln!(out, "</pre></div>")
    }
}

impl Backend for HtmlBackend {
    fn format(&self) -> TargetFormat {
        match self.flavor {
            Flavor::Plain => TargetFormat::Html,
            Flavor::JsCoq => TargetFormat::JsCoq,
        }
    }

    fn start_document(
        &mut self,
        out: &mut dyn Write,
        title: &str,
        flags: DocumentFlags,
        _ctx: &RenderContext,
    ) -> io::Result<()> {
        self.flags = Some(flags);
        self.document_tocs.clear();
        self.snippets.clear();
        if flags.standalone {
            self.write_header(out, title)?;
        }
        Ok(())
    }

    fn render_unit(
        &mut self,
        out: &mut dyn Write,
        unit: &SourceUnit,
        text: &str,
        ctx: &RenderContext,
    ) -> io::Result<()> {
        let module = unit.module.as_str();
        let heading = library_title(module, ctx.options.short_titles);
        writeln!(
            out,
            "<h1 class=\"libtitle\" id=\"{}\">{}</h1>",
            html_escape(module),
            html_escape(&heading)
        )?;

        let mut entries = Vec::new();
        let mut headings = 0;
        for block in literate::parse(text, ctx.options.light) {
            match block {
                Block::Heading { level, text } => {
                    headings += 1;
                    let id = toc::heading_anchor(module, headings, &text);
                    writeln!(
                        out,
                        "<h{lvl} class=\"section\" id=\"{}\">{}</h{lvl}>",
                        html_escape(&id),
                        inline_markup(&text),
                        lvl = level + 1
                    )?;
                    if toc::within_depth(level, ctx.options.toc_depth) {
                        entries.push(TocEntry {
                            level,
                            text,
                            anchor: id,
                        });
                    }
                }
                Block::Doc(text) => {
                    writeln!(out, "<div class=\"doc\">{}</div>", inline_markup(&text))?;
                }
                Block::Code { offset, text } => {
                    self.write_code(out, module, offset, &text, ctx)?;
                }
            }
        }

        let module_toc = ModuleToc {
            module: module.to_string(),
            entries,
        };
        self.document_tocs.push(module_toc.clone());
        self.run_tocs.push(module_toc);
        Ok(())
    }

    fn end_document(&mut self, out: &mut dyn Write, ctx: &RenderContext) -> io::Result<()> {
        let Some(flags) = self.flags.take() else {
            return Ok(());
        };
        if flags.toc {
            writeln!(out, "<div id=\"toc\">\n<h2>Table of contents</h2>")?;
            write_toc(out, &self.document_tocs, ctx)?;
            writeln!(out, "</div>")?;
        }
        if flags.index {
            let entries = ctx.index.alphabetic_entries();
            writeln!(out, "<div id=\"index\">\n<h2>Index</h2>")?;
            write_index_sections(out, &entries, ctx)?;
            writeln!(out, "</div>")?;
        }
        if flags.standalone {
            self.write_footer(out)?;
        }
        Ok(())
    }

    fn appendix(
        &mut self,
        dir: &OutputDir,
        flags: DocumentFlags,
        ctx: &RenderContext,
    ) -> DocResult<()> {
        let ext = self.file_extension();
        self.snippets.clear();

        if flags.toc {
            let title = page_title(ctx, "Table of contents");
            dir.write_file(&format!("toc.{}", ext), |out| {
                if flags.standalone {
                    self.write_header(out, &title)?;
                }
                writeln!(out, "<h1>{}</h1>", html_escape(&title))?;
                write_toc(out, &self.run_tocs, ctx)?;
                if flags.standalone {
                    self.write_footer(out)?;
                }
                Ok(())
            })?;
        }

        if !flags.index {
            return Ok(());
        }

        let entries = ctx.index.alphabetic_entries();
        let index_name = ctx.options.index_name.as_str();
        let title = page_title(ctx, "Index");

        if !flags.split_index {
            return dir.write_file(&format!("{}.{}", index_name, ext), |out| {
                if flags.standalone {
                    self.write_header(out, &title)?;
                }
                writeln!(out, "<h1>{}</h1>", html_escape(&title))?;
                write_index_sections(out, &entries, ctx)?;
                if flags.standalone {
                    self.write_footer(out)?;
                }
                Ok(())
            });
        }

        let groups = toc::group_by_letter(&entries);
        let letters: Vec<char> = groups.keys().copied().collect();
        let nav = |out: &mut dyn Write| -> io::Result<()> {
            write!(out, "<p class=\"index-nav\">")?;
            for letter in &letters {
                write!(
                    out,
                    "<a href=\"{}\">{}</a> ",
                    toc::letter_file(index_name, *letter, ext),
                    letter
                )?;
            }
            writeln!(out, "</p>")
        };

        dir.write_file(&format!("{}.{}", index_name, ext), |out| {
            if flags.standalone {
                self.write_header(out, &title)?;
            }
            writeln!(out, "<h1>{}</h1>", html_escape(&title))?;
            nav(out)?;
            if flags.standalone {
                self.write_footer(out)?;
            }
            Ok(())
        })?;

        for (letter, defs) in &groups {
            let name = toc::letter_file(index_name, *letter, ext);
            dir.write_file(&name, |out| {
                let page = format!("{} ({})", title, letter);
                if flags.standalone {
                    self.write_header(out, &page)?;
                }
                writeln!(out, "<h1>{}</h1>", html_escape(&page))?;
                nav(out)?;
                write_index_entries(out, defs, ctx)?;
                if flags.standalone {
                    self.write_footer(out)?;
                }
                Ok(())
            })?;
        }
        Ok(())
    }

    fn static_assets(&self) -> &'static [&'static str] {
        match self.flavor {
            Flavor::Plain => &["coqdoc.css"],
            Flavor::JsCoq => &["coqdoc.css", "jscoq-doc.js"],
        }
    }
}

fn page_title(ctx: &RenderContext, fallback: &str) -> String {
    if ctx.options.title.is_empty() {
        fallback.to_string()
    } else {
        format!("{}: {}", ctx.options.title, fallback)
    }
}

fn href(style: LinkStyle, module: &str, anchor: &str) -> String {
    match style {
        LinkStyle::SameDocument => format!("#{}", anchor),
        LinkStyle::PerModule { extension } => format!("{}.{}#{}", module, extension, anchor),
    }
}

/// Heading of a module's section; `-s` drops the "Library" prefix.
fn library_title(module: &str, short: bool) -> String {
    if short {
        module.to_string()
    } else {
        format!("Library {}", module)
    }
}

fn write_toc(out: &mut dyn Write, tocs: &[ModuleToc], ctx: &RenderContext) -> io::Result<()> {
    let style = ctx.link_style;
    writeln!(out, "<ul class=\"toc\">")?;
    for module_toc in tocs {
        let module = module_toc.module.as_str();
        writeln!(
            out,
            "<li class=\"toc-library\"><a href=\"{}\">{}</a>",
            html_escape(&href(style, module, module)),
            html_escape(&library_title(module, ctx.options.short_titles))
        )?;
        if !module_toc.entries.is_empty() {
            writeln!(out, "<ul>")?;
            for entry in &module_toc.entries {
                writeln!(
                    out,
                    "<li class=\"toc-section-{}\"><a href=\"{}\">{}</a></li>",
                    entry.level,
                    html_escape(&href(style, module, &entry.anchor)),
                    inline_markup(&entry.text)
                )?;
            }
            writeln!(out, "</ul>")?;
        }
        writeln!(out, "</li>")?;
    }
    writeln!(out, "</ul>")
}

/// Whole index on one page: letter navigation plus one section per letter.
fn write_index_sections(
    out: &mut dyn Write,
    entries: &[&Definition],
    ctx: &RenderContext,
) -> io::Result<()> {
    let groups = toc::group_by_letter(entries);
    write!(out, "<p class=\"index-nav\">")?;
    for letter in groups.keys() {
        write!(out, "<a href=\"#index_{}\">{}</a> ", letter, letter)?;
    }
    writeln!(out, "</p>")?;
    for (letter, defs) in &groups {
        writeln!(out, "<h3 id=\"index_{}\">{}</h3>", letter, letter)?;
        write_index_entries(out, defs, ctx)?;
    }
    Ok(())
}

fn write_index_entries(
    out: &mut dyn Write,
    defs: &[&Definition],
    ctx: &RenderContext,
) -> io::Result<()> {
    writeln!(out, "<ul class=\"index\">")?;
    for def in defs {
        let target = href(ctx.link_style, &def.module, &anchor(&def.module, &def.name));
        let library = href(ctx.link_style, &def.module, &def.module);
        writeln!(
            out,
            "<li><a href=\"{}\">{}</a> <span class=\"kind\">[{}]</span>, in <a href=\"{}\">{}</a></li>",
            html_escape(&target),
            html_escape(&def.name),
            html_escape(&def.kind),
            html_escape(&library),
            html_escape(&def.module)
        )?;
    }
    writeln!(out, "</ul>")
}

/// Escape prose and turn `[code]` into inline code spans.
fn inline_markup(text: &str) -> String {
    RE_INLINE_CODE
        .replace_all(&html_escape(text), "<span class=\"inlinecode\">$1</span>")
        .into_owned()
}
