//! Glob file reader.
//!
//! ```text
//! DIGEST 5c2b1e...
//! FLib.Lists
//! R44:46 Coq.Init.Datatypes <> nat ind
//! def 12:17 <> length
//! ```

/// One meaningful line of a glob file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobLine {
    /// `F<module>`
    Module(String),
    /// `R<start>:<end> <module> <path> <name> <kind>`
    Reference {
        start: usize,
        end: usize,
        module: String,
        name: String,
        kind: String,
    },
    /// `<kind> <start>:<end> <path> <name>`
    Definition {
        kind: String,
        start: usize,
        end: usize,
        name: String,
    },
}

pub fn parse(content: &str) -> Vec<GlobLine> {
    let mut lines = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with("DIGEST") {
            continue;
        }
        match parse_line(line) {
            Some(parsed) => lines.push(parsed),
            None => tracing::debug!(line = lineno + 1, text = line, "skipping glob line"),
        }
    }
    lines
}

fn parse_line(line: &str) -> Option<GlobLine> {
    if let Some(module) = line.strip_prefix('F') {
        if !module.contains(char::is_whitespace) && !module.is_empty() {
            return Some(GlobLine::Module(module.to_string()));
        }
    }

    let fields: Vec<&str> = line.split_whitespace().collect();

    if let Some(range) = fields[0].strip_prefix('R') {
        if let [_, module, path, name, kind] = fields.as_slice() {
            let (start, end) = parse_range(range)?;
            return Some(GlobLine::Reference {
                start,
                end,
                module: (*module).to_string(),
                name: qualify(path, name),
                kind: (*kind).to_string(),
            });
        }
        return None;
    }

    match fields.as_slice() {
        [kind, range, path, name] => {
            let (start, end) = parse_range(range)?;
            Some(GlobLine::Definition {
                kind: (*kind).to_string(),
                start,
                end,
                name: qualify(path, name),
            })
        }
        _ => None,
    }
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    let (start, end) = range.split_once(':')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

/// `<>` stands for an empty path or name.
fn qualify(path: &str, name: &str) -> String {
    let name = if name == "<>" { "" } else { name };
    match path {
        "<>" | "" => name.to_string(),
        _ if name.is_empty() => path.to_string(),
        _ => format!("{}.{}", path, name),
    }
}
