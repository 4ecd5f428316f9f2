//! Condensed view of source files used as context for questions.
//!
//! Each relevant file is reduced to the lines that look like imports,
//! function declarations or variable bindings. The matching is purely
//! line-based; there is no parsing.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use walkdir::{DirEntry, WalkDir};

const RELEVANT_EXTENSIONS: &[&str] = &["go", "c", "cpp", "py", "js", "ts", "tsx", "jsx"];

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(import|include|from|require)\b.*").expect("built-in import pattern")
});
static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(func|def|function)\s+[a-zA-Z_][a-zA-Z0-9_]*\s*\(")
        .expect("built-in function pattern")
});
static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(var|let|const|[a-zA-Z_][a-zA-Z0-9_]*\s*(:?=|:))")
        .expect("built-in variable pattern")
});

/// The essential lines of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEssence {
    pub file_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<String>,
}

impl CodeEssence {
    fn classify(&mut self, line: &str) {
        if IMPORT_RE.is_match(line) {
            self.imports.push(line.to_string());
        } else if FUNCTION_RE.is_match(line) {
            self.functions.push(line.to_string());
        } else if VARIABLE_RE.is_match(line) {
            self.variables.push(line.to_string());
        }
    }
}

/// Extract imports, functions and variables from `reader`.
pub fn extract_essence_from_reader<R: BufRead>(file_path: &str, reader: R) -> Result<CodeEssence> {
    let mut essence = CodeEssence {
        file_path: file_path.to_string(),
        ..CodeEssence::default()
    };
    let mut in_block_comment = false;

    for line in reader.lines() {
        let line = line.with_context(|| format!("error scanning {file_path}"))?;
        let line = line.trim();

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if line.starts_with("/*") {
            in_block_comment = !line.contains("*/");
            continue;
        }
        if in_block_comment {
            if line.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }

        essence.classify(line);
    }

    Ok(essence)
}

pub fn extract_essence(path: &Path) -> Result<CodeEssence> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    extract_essence_from_reader(&path.display().to_string(), BufReader::new(file))
}

/// Walk `root` and extract the essence of every relevant source file.
///
/// Hidden directories below `root` are skipped. Files that cannot be read
/// are logged and left out.
pub fn scan_directory(root: &Path) -> Result<Vec<CodeEssence>> {
    let mut results = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry.with_context(|| format!("error walking {}", root.display()))?;
        if !entry.file_type().is_file() || !is_relevant_file(entry.path()) {
            continue;
        }

        match extract_essence(entry.path()) {
            Ok(essence) => results.push(essence),
            Err(e) => log::warn!("Skipping {}: {e:#}", entry.path().display()),
        }
    }

    log::info!("Scanned {} source files under {}", results.len(), root.display());
    Ok(results)
}

/// Pretty JSON of `essences`, cut down to at most `max_chars` characters.
pub fn render_context(essences: &[CodeEssence], max_chars: usize) -> Result<String> {
    let json = serde_json::to_string_pretty(essences).context("failed to encode code essence")?;

    match json.char_indices().nth(max_chars) {
        None => Ok(json),
        Some((cut, _)) => Ok(format!(
            "{}\n[context truncated, {} of {} characters shown]",
            &json[..cut],
            max_chars,
            json.chars().count()
        )),
    }
}

fn is_relevant_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            RELEVANT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
