use super::patterns::{detect_language, significant_match};
use super::{is_diff_header, AnalyzerConfig};

/// Keep only significant lines of important files, each preceded by up to
/// `context_lines` lines of context.
///
/// Windows of nearby matches are appended independently, so a line can appear
/// more than once in the output.
pub fn filter_important_changes<'a>(lines: &[&'a str], config: &AnalyzerConfig) -> Vec<&'a str> {
    let mut filtered = Vec::new();
    let mut language = "";
    let mut important = false;

    for (i, line) in lines.iter().enumerate() {
        if is_diff_header(line) {
            language = detect_language(line);
            important = is_important_file(line, &config.important_file_markers);
            continue;
        }

        if !important {
            continue;
        }

        if let Some(hit) = significant_match(line, language) {
            log::trace!("line {i} is significant ({}): {line}", hit.description);
            let start = i.saturating_sub(config.context_lines);
            filtered.extend_from_slice(&lines[start..=i]);
        }
    }

    filtered
}

fn is_important_file(header: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| header.contains(marker.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(context_lines: usize) -> AnalyzerConfig {
        AnalyzerConfig {
            context_lines,
            ..AnalyzerConfig::default()
        }
    }

    #[test]
    fn keeps_match_with_preceding_context() {
        let lines = vec![
            "diff --git a/pkg/service/x.py b/pkg/service/x.py",
            "@@ -1,2 +1,3 @@",
            " import os",
            "+def handle(): pass",
            " x = 1",
        ];
        let out = filter_important_changes(&lines, &cfg(3));
        assert_eq!(out, lines[0..4].to_vec());
    }

    #[test]
    fn context_window_clamps_at_start() {
        let lines = vec!["diff --git a/main.go b/main.go", "+func A() {}"];
        let out = filter_important_changes(&lines, &cfg(10));
        assert_eq!(out, lines);
    }

    #[test]
    fn unimportant_files_are_dropped() {
        let lines = vec!["diff --git a/lib/util.go b/lib/util.go", "+func A() {}"];
        assert!(filter_important_changes(&lines, &cfg(3)).is_empty());
    }

    #[test]
    fn unknown_language_contributes_nothing() {
        let lines = vec![
            "diff --git a/core/main.rb b/core/main.rb",
            "+def run",
            "+class Foo",
            "diff --git a/core/notes.txt b/core/notes.txt",
            "+func Bar() {}",
        ];
        assert!(filter_important_changes(&lines, &cfg(3)).is_empty());
    }

    #[test]
    fn language_resets_on_each_header() {
        let lines = vec![
            "diff --git a/api/a.go b/api/a.go",
            "+def not_go():",
            "diff --git a/api/b.py b/api/b.py",
            "+def handle():",
        ];
        let out = filter_important_changes(&lines, &cfg(0));
        assert_eq!(out, vec!["+def handle():"]);
    }

    #[test]
    fn overlapping_windows_duplicate_lines() {
        let lines = vec![
            "diff --git a/main.go b/main.go",
            "+func A() {}",
            "+func B() {}",
        ];
        let out = filter_important_changes(&lines, &cfg(3));
        assert_eq!(
            out,
            vec![
                "diff --git a/main.go b/main.go",
                "+func A() {}",
                "diff --git a/main.go b/main.go",
                "+func A() {}",
                "+func B() {}",
            ]
        );
    }
}
