use regex::Regex;
use std::collections::HashMap;

use super::is_diff_header;

/// The `+`/`-` lines collected for one file, in diff order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChanges {
    pub path: String,
    pub lines: Vec<String>,
}

/// Changed lines grouped by file, keyed in first-encounter order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileChangeSet {
    files: Vec<FileChanges>,
    index: HashMap<String, usize>,
}

impl FileChangeSet {
    pub fn push(&mut self, path: &str, line: &str) {
        let idx = match self.index.get(path) {
            Some(&idx) => idx,
            None => {
                self.files.push(FileChanges {
                    path: path.to_string(),
                    lines: Vec::new(),
                });
                self.index.insert(path.to_string(), self.files.len() - 1);
                self.files.len() - 1
            }
        };
        self.files[idx].lines.push(line.to_string());
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.index
            .get(path)
            .map(|&idx| self.files[idx].lines.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileChanges> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// File path named by a `diff --git a/<path> b/<path>` header.
///
/// Returns `None` for headers with fewer than three tokens.
pub fn file_name_from_header(header: &str) -> Option<String> {
    let token = header.split_whitespace().nth(2)?;
    Some(token.strip_prefix("a/").unwrap_or(token).to_string())
}

/// `--- <old>` / `+++ <new>` marker lines announced by a diff header.
fn file_markers(header: &str) -> Vec<String> {
    let mut tokens = header.split_whitespace().skip(2);
    let mut markers = vec!["--- /dev/null".to_string(), "+++ /dev/null".to_string()];
    if let Some(old) = tokens.next() {
        markers.push(format!("--- {old}"));
    }
    if let Some(new) = tokens.next() {
        markers.push(format!("+++ {new}"));
    }
    markers
}

/// Group added and removed lines by file, dropping lines that match `ignore`.
pub fn extract_meaningful_changes(lines: &[&str], ignore: &[Regex]) -> FileChangeSet {
    let mut changes = FileChangeSet::default();
    let mut current_file = String::new();
    let mut markers = Vec::new();
    let mut in_hunk = false;

    for line in lines {
        if is_diff_header(line) {
            current_file = file_name_from_header(line).unwrap_or_default();
            if current_file.is_empty() {
                log::debug!("malformed diff header, dropping changes until the next one: {line:?}");
            }
            markers = file_markers(line);
            in_hunk = false;
            continue;
        }

        if line.starts_with("@@") {
            in_hunk = true;
        }

        // Only the header's own `--- a/x` / `+++ b/x` pair, and only before the first hunk.
        if !in_hunk && markers.iter().any(|m| m == line) {
            continue;
        }

        if ignore.iter().any(|re| re.is_match(line)) {
            continue;
        }

        if !current_file.is_empty() && (line.starts_with('+') || line.starts_with('-')) {
            changes.push(&current_file, line);
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalyzerConfig;

    fn ignore() -> Vec<Regex> {
        AnalyzerConfig::default()
            .ignore_line_patterns
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect()
    }

    #[test]
    fn header_parsing() {
        assert_eq!(
            file_name_from_header("diff --git a/pkg/service/x.py b/pkg/service/x.py").as_deref(),
            Some("pkg/service/x.py")
        );
        assert_eq!(file_name_from_header("diff --git x y").as_deref(), Some("x"));
        assert_eq!(file_name_from_header("diff --git"), None);
    }

    #[test]
    fn groups_changes_by_file_in_encounter_order() {
        let lines = vec![
            "diff --git a/b.go b/b.go",
            "--- a/b.go",
            "+++ b/b.go",
            "@@ -1,2 +1,2 @@",
            "-old()",
            "+new()",
            " unchanged()",
            "diff --git a/a.go b/a.go",
            "@@ -0,0 +1 @@",
            "+added()",
        ];
        let changes = extract_meaningful_changes(&lines, &ignore());

        let paths: Vec<_> = changes.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["b.go", "a.go"]);
        assert_eq!(changes.get("b.go").unwrap(), &["-old()", "+new()"]);
        assert_eq!(changes.get("a.go").unwrap(), &["+added()"]);
    }

    #[test]
    fn ignore_patterns_match_the_raw_line() {
        let lines = vec![
            "diff --git a/main.go b/main.go",
            "@@ -1 +1,5 @@",
            "",
            "  // indented comment",
            "   * block continuation",
            "+// added comment",
            "+x := 1",
        ];
        let changes = extract_meaningful_changes(&lines, &ignore());
        assert_eq!(changes.get("main.go").unwrap(), &["+// added comment", "+x := 1"]);
    }

    #[test]
    fn c_preprocessor_and_pointer_lines_are_counted() {
        let lines = vec![
            "diff --git a/core/x.c b/core/x.c",
            "+#include <stdio.h>",
            "+*p = 1;",
            "+#define N 4",
            "-// old note",
        ];
        let changes = extract_meaningful_changes(&lines, &ignore());
        assert_eq!(
            changes.get("core/x.c").unwrap(),
            &["+#include <stdio.h>", "+*p = 1;", "+#define N 4", "-// old note"]
        );
    }

    #[test]
    fn malformed_header_drops_until_next_header() {
        let lines = vec![
            "diff --git",
            "+foo",
            "diff --git a/ok.go b/ok.go",
            "+bar",
        ];
        let changes = extract_meaningful_changes(&lines, &ignore());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get("ok.go").unwrap(), &["+bar"]);
    }

    #[test]
    fn lines_before_any_header_are_dropped() {
        let lines = vec!["+orphan", "-orphan"];
        assert!(extract_meaningful_changes(&lines, &ignore()).is_empty());
    }

    #[test]
    fn headerless_triple_dash_lines_are_removals() {
        let lines = vec![
            "diff --git a/q.sql b/q.sql",
            "--- drop stale sql comment",
            "+select 1;",
        ];
        let changes = extract_meaningful_changes(&lines, &ignore());
        assert_eq!(
            changes.get("q.sql").unwrap(),
            &["--- drop stale sql comment", "+select 1;"]
        );
    }

    #[test]
    fn header_file_markers_are_skipped_before_first_hunk() {
        let lines = vec![
            "diff --git a/old.go b/new.go",
            "--- a/old.go",
            "+++ b/new.go",
            "@@ -1 +1 @@",
            "+x",
            "diff --git a/gone.go b/gone.go",
            "--- a/gone.go",
            "+++ /dev/null",
            "-y",
        ];
        let changes = extract_meaningful_changes(&lines, &ignore());
        assert_eq!(changes.get("old.go").unwrap(), &["+x"]);
        assert_eq!(changes.get("gone.go").unwrap(), &["-y"]);
    }

    #[test]
    fn triple_markers_inside_hunks_are_changes() {
        let lines = vec![
            "diff --git a/notes.sql b/notes.sql",
            "@@ -1 +1 @@",
            "--- removed sql comment",
            "+++ added counter",
        ];
        let changes = extract_meaningful_changes(&lines, &ignore());
        assert_eq!(
            changes.get("notes.sql").unwrap(),
            &["--- removed sql comment", "+++ added counter"]
        );
    }
}
