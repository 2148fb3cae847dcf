//! Table of contents and index bookkeeping shared by the backends.

use crate::index::Definition;
use std::collections::BTreeMap;

/// A heading that made it into the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub anchor: String,
}

/// Headings of one rendered module, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleToc {
    pub module: String,
    pub entries: Vec<TocEntry>,
}

/// Heading anchor slug.
///
/// - lowercase
/// - keep alphanumerics, spaces and hyphens; drop everything else
/// - spaces become hyphens
pub fn slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.trim().replace(' ', "-")
}

/// Anchor of the `nth` heading of `module`. The counter keeps repeated
/// titles apart.
pub fn heading_anchor(module: &str, nth: usize, text: &str) -> String {
    format!("{}.{}-{}", module, nth, slug(text))
}

/// Whether a heading of `level` is kept under the `--toc-depth` limit.
pub fn within_depth(level: u8, depth: Option<u8>) -> bool {
    depth.map_or(true, |d| level <= d)
}

/// Split index entries into letter buckets, preserving their order.
pub fn group_by_letter<'a>(entries: &[&'a Definition]) -> BTreeMap<char, Vec<&'a Definition>> {
    let mut groups: BTreeMap<char, Vec<&Definition>> = BTreeMap::new();
    for def in entries {
        groups.entry(def.index_letter()).or_default().push(def);
    }
    groups
}

/// File name of one letter page of a split index.
pub fn letter_file(index_name: &str, letter: char, ext: &str) -> String {
    format!("{}_{}.{}", index_name, letter, ext)
}
