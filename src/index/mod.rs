//! Cross-reference index shared by the preload phase and the renderer.
//!
//! Filled before rendering starts and only read afterwards. Every entry is
//! keyed, so merging the same glob data twice leaves the index unchanged.

pub mod glob;

use crate::error::{DocError, DocResult};
use crate::source::SourceUnit;
use self::glob::GlobLine;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

pub const DEFAULT_COQLIB: &str = "https://coq.inria.fr/doc/V8.20.0/stdlib";

/// A name introduced by a module, e.g. `def 12:17 <> length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub module: String,
    pub name: String,
    pub kind: String,
    pub start: usize,
    pub end: usize,
}

impl Definition {
    /// Last dotted segment, used for alphabetical ordering.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Letter bucket for split indexes; non-letters go to `_`.
    pub fn index_letter(&self) -> char {
        match self.short_name().chars().next() {
            Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => '_',
        }
    }
}

/// A use site pointing at a definition, possibly in another module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub module: String,
    pub name: String,
    pub kind: String,
    pub end: usize,
}

/// How links to locally documented modules are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Every module lives in the same output document.
    SameDocument,
    /// Every module has its own `<module>.<extension>` file.
    PerModule { extension: &'static str },
}

/// Anchor id of a definition (or of a module when `name` is empty).
pub fn anchor(module: &str, name: &str) -> String {
    if name.is_empty() {
        module.to_string()
    } else {
        format!("{}.{}", module, name)
    }
}

#[derive(Debug, Default)]
pub struct CrossRefIndex {
    modules: BTreeSet<String>,
    definitions: BTreeMap<(String, String), Definition>,
    definitions_at: HashMap<(String, usize), (String, String)>,
    references: HashMap<(String, usize), Reference>,
    external_roots: Vec<(String, String)>,
}

impl CrossRefIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `module` as documented in this run.
    pub fn register_module(&mut self, module: &str) {
        self.modules.insert(module.to_string());
    }

    pub fn is_local(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    /// Link modules under `root` to `url`. Re-adding a root replaces its URL.
    pub fn add_external_root(&mut self, url: &str, root: &str) {
        let url = url.trim_end_matches('/').to_string();
        match self.external_roots.iter_mut().find(|(r, _)| r == root) {
            Some(entry) => entry.1 = url,
            None => self.external_roots.push((root.to_string(), url)),
        }
    }

    /// Read a glob file and merge it.
    ///
    /// With a unit, every entry belongs to that unit's module and `F` lines
    /// are ignored. Without one, `F` lines select the module.
    pub fn merge_glob_file(&mut self, unit: Option<&SourceUnit>, path: &Path) -> DocResult<usize> {
        let content = fs::read_to_string(path).map_err(|source| DocError::MetadataRead {
            path: path.to_path_buf(),
            source,
        })?;
        let merged = self.merge_glob(unit.map(|u| u.module.as_str()), &content);
        tracing::debug!(path = %path.display(), entries = merged, "merged glob file");
        Ok(merged)
    }

    /// Merge glob text, returning how many entries were stored.
    pub fn merge_glob(&mut self, unit_module: Option<&str>, content: &str) -> usize {
        let mut current: Option<String> = unit_module.map(str::to_string);
        let mut merged = 0;

        for line in glob::parse(content) {
            match line {
                GlobLine::Module(module) => {
                    if unit_module.is_none() {
                        current = Some(module);
                    }
                }
                GlobLine::Reference {
                    start,
                    end,
                    module,
                    name,
                    kind,
                } => {
                    let Some(ref owner) = current else { continue };
                    self.references.insert(
                        (owner.clone(), start),
                        Reference {
                            module,
                            name,
                            kind,
                            end,
                        },
                    );
                    merged += 1;
                }
                GlobLine::Definition {
                    kind,
                    start,
                    end,
                    name,
                } => {
                    let Some(ref owner) = current else { continue };
                    if kind == "binder" {
                        continue;
                    }
                    let key = (owner.clone(), name.clone());
                    self.definitions_at.insert((owner.clone(), start), key.clone());
                    self.definitions.insert(
                        key,
                        Definition {
                            module: owner.clone(),
                            name,
                            kind,
                            start,
                            end,
                        },
                    );
                    merged += 1;
                }
            }
        }
        merged
    }

    pub fn reference_at(&self, module: &str, offset: usize) -> Option<&Reference> {
        self.references.get(&(module.to_string(), offset))
    }

    pub fn definition_at(&self, module: &str, offset: usize) -> Option<&Definition> {
        let key = self.definitions_at.get(&(module.to_string(), offset))?;
        self.definitions.get(key)
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Hyperlink target for `module`/`name`, if anything documents it.
    pub fn resolve_link(&self, module: &str, name: &str, style: LinkStyle) -> Option<String> {
        let anchor = anchor(module, name);
        if self.is_local(module) {
            return Some(match style {
                LinkStyle::SameDocument => format!("#{}", anchor),
                LinkStyle::PerModule { extension } => {
                    format!("{}.{}#{}", module, extension, anchor)
                }
            });
        }

        // Longest root wins here, unlike path bindings.
        self.external_roots
            .iter()
            .filter(|(root, _)| {
                module == root
                    || module
                        .strip_prefix(root.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            })
            .max_by_key(|(root, _)| root.len())
            .map(|(_, url)| format!("{}/{}.html#{}", url, module, anchor))
    }

    /// Definitions of locally documented modules, in index order.
    pub fn alphabetic_entries(&self) -> Vec<&Definition> {
        let mut entries: Vec<&Definition> = self
            .definitions
            .values()
            .filter(|d| self.is_local(&d.module))
            .collect();
        entries.sort_by(|a, b| {
            a.short_name()
                .to_lowercase()
                .cmp(&b.short_name().to_lowercase())
                .then_with(|| a.module.cmp(&b.module))
                .then_with(|| a.name.cmp(&b.name))
        });
        entries
    }
}
