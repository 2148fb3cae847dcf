//! Literate source splitting.
//!
//! A `.v` file is a sequence of code and `(** ... *)` documentation
//! comments. Documentation lines starting with one to four `*` are headings.
//! Code blocks keep their byte offset so glob offsets can be matched later.

use crate::index::{CrossRefIndex, Definition, Reference};
use regex::{bytes, Regex};
use std::sync::LazyLock;

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\*{1,4})\s+(.+?)\s*$").unwrap());

static RE_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_']*(?:\.[A-Za-z_][A-Za-z0-9_']*)*").unwrap()
});

// Matched against `mask_literals` output, never the raw source.
static RE_PROOF_START: LazyLock<bytes::Regex> =
    LazyLock::new(|| bytes::Regex::new(r"\bProof\b").unwrap());

static RE_PROOF_END: LazyLock<bytes::Regex> =
    LazyLock::new(|| bytes::Regex::new(r"\b(?:Qed|Defined|Admitted|Abort)\s*\.").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Doc(String),
    Code { offset: usize, text: String },
}

/// Split `source` into blocks. In `light` mode proof bodies are dropped.
pub fn parse(source: &str, light: bool) -> Vec<Block> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut in_proof = false;
    let mut code_start = 0;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];
        if in_string {
            if rest[0] == b'"' {
                in_string = false;
            }
            i += 1;
        } else if depth > 0 {
            if rest.starts_with(b"(*") {
                depth += 1;
                i += 2;
            } else if rest.starts_with(b"*)") {
                depth -= 1;
                i += 2;
            } else {
                i += 1;
            }
        } else if rest.starts_with(b"(**") && !rest.starts_with(b"(**)") {
            push_code(&mut blocks, source, code_start, i, light, &mut in_proof);
            let body_end = comment_end(bytes, i + 3);
            push_doc(&mut blocks, &source[i + 3..body_end]);
            i = (body_end + 2).min(bytes.len());
            code_start = i;
        } else if rest.starts_with(b"(*") {
            depth = 1;
            i += 2;
        } else {
            if rest[0] == b'"' {
                in_string = true;
            }
            i += 1;
        }
    }
    push_code(&mut blocks, source, code_start, bytes.len(), light, &mut in_proof);
    blocks
}

/// Position of the `*)` closing the comment whose body starts at `from`,
/// or the end of input for an unterminated comment.
fn comment_end(bytes: &[u8], from: usize) -> usize {
    let mut depth = 1;
    let mut j = from;
    while j < bytes.len() {
        if bytes[j..].starts_with(b"(*") {
            depth += 1;
            j += 2;
        } else if bytes[j..].starts_with(b"*)") {
            depth -= 1;
            if depth == 0 {
                return j;
            }
            j += 2;
        } else {
            j += 1;
        }
    }
    bytes.len()
}

fn push_doc(blocks: &mut Vec<Block>, body: &str) {
    let mut paragraph: Vec<&str> = Vec::new();
    let flush = |blocks: &mut Vec<Block>, paragraph: &mut Vec<&str>| {
        if !paragraph.is_empty() {
            blocks.push(Block::Doc(paragraph.join("\n")));
            paragraph.clear();
        }
    };

    for line in body.lines() {
        if let Some(caps) = RE_HEADING.captures(line) {
            flush(blocks, &mut paragraph);
            blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: caps[2].to_string(),
            });
        } else if line.trim().is_empty() {
            flush(blocks, &mut paragraph);
        } else {
            paragraph.push(line.trim());
        }
    }
    flush(blocks, &mut paragraph);
}

fn push_code(
    blocks: &mut Vec<Block>,
    source: &str,
    start: usize,
    end: usize,
    light: bool,
    in_proof: &mut bool,
) {
    if !light {
        push_code_span(blocks, source, start, end);
        return;
    }

    let masked = mask_literals(&source.as_bytes()[start..end]);
    let mut pos = 0;
    while pos < masked.len() {
        let rest = &masked[pos..];
        if *in_proof {
            match RE_PROOF_END.find(rest) {
                Some(m) => {
                    *in_proof = false;
                    pos += m.end();
                }
                None => return,
            }
        } else {
            match RE_PROOF_START.find(rest) {
                Some(m) => {
                    push_code_span(blocks, source, start + pos, start + pos + m.start());
                    *in_proof = true;
                    pos += m.end();
                }
                None => {
                    push_code_span(blocks, source, start + pos, end);
                    return;
                }
            }
        }
    }
}

/// Copy of `code` with comment and string contents blanked, so keyword
/// searches only see sentence-level text. Offsets are unchanged.
fn mask_literals(code: &[u8]) -> Vec<u8> {
    let mut masked = code.to_vec();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut i = 0;

    while i < code.len() {
        let rest = &code[i..];
        if in_string {
            if rest[0] == b'"' {
                in_string = false;
            } else {
                masked[i] = b' ';
            }
            i += 1;
        } else if rest.starts_with(b"(*") {
            depth += 1;
            masked[i..i + 2].fill(b' ');
            i += 2;
        } else if depth > 0 && rest.starts_with(b"*)") {
            depth -= 1;
            masked[i..i + 2].fill(b' ');
            i += 2;
        } else if depth > 0 {
            masked[i] = b' ';
            i += 1;
        } else {
            if rest[0] == b'"' {
                in_string = true;
            }
            i += 1;
        }
    }
    masked
}

/// Push `source[start..end]` without its surrounding blank lines.
fn push_code_span(blocks: &mut Vec<Block>, source: &str, start: usize, end: usize) {
    let raw = &source[start..end];
    let trimmed = raw.trim_start_matches(['\n', '\r']);
    let offset = start + (raw.len() - trimmed.len());
    let text = trimmed.trim_end();
    if text.trim().is_empty() {
        return;
    }
    blocks.push(Block::Code {
        offset,
        text: text.to_string(),
    });
}

/// A piece of a code block after cross-reference lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePiece<'a> {
    Text(&'a str),
    Ref {
        text: &'a str,
        offset: usize,
        target: &'a Reference,
    },
    Def {
        text: &'a str,
        offset: usize,
        def: &'a Definition,
    },
}

/// Split a code block into plain text and identifiers known to the index.
pub fn annotate<'a>(
    text: &'a str,
    offset: usize,
    module: &str,
    index: &'a CrossRefIndex,
) -> Vec<CodePiece<'a>> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for m in RE_IDENT.find_iter(text) {
        let at = offset + m.start();
        let piece = if let Some(target) = index.reference_at(module, at) {
            CodePiece::Ref {
                text: m.as_str(),
                offset: at,
                target,
            }
        } else if let Some(def) = index.definition_at(module, at) {
            CodePiece::Def {
                text: m.as_str(),
                offset: at,
                def,
            }
        } else {
            continue;
        };
        if m.start() > last {
            pieces.push(CodePiece::Text(&text[last..m.start()]));
        }
        pieces.push(piece);
        last = m.end();
    }
    if last < text.len() {
        pieces.push(CodePiece::Text(&text[last..]));
    }
    pieces
}
