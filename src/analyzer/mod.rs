//! Diff-to-prompt reduction.
//!
//! A unified diff is split into lines, optionally narrowed down to the
//! significant lines of important files (only for large diffs), grouped by
//! file, counted, and rendered into the commit-message prompt template.
//!
//! Everything here is pure: an [`Analyzer`] holds its configuration and the
//! compiled ignore patterns and can be shared freely between threads.

mod extract;
mod filter;
mod patterns;
mod summary;

use regex::Regex;
use thiserror::Error;

use crate::llm::prompt_builder;

pub use extract::{extract_meaningful_changes, file_name_from_header, FileChangeSet, FileChanges};
pub use filter::filter_important_changes;
pub use patterns::{detect_language, patterns_for, significant_match, ChangeSignificancePattern};
pub use summary::{generate_summary, Summary};

const DIFF_HEADER: &str = "diff --git";

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("diff is empty, nothing to summarize")]
    EmptyInput,

    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Tuning knobs for one run of the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Diffs with more lines than this go through the importance filter.
    pub max_lines: usize,
    /// Lines of context kept before each significant line.
    pub context_lines: usize,
    /// Path substrings that make a file worth filtering for.
    pub important_file_markers: Vec<String>,
    /// Lines whose content matches any of these are dropped.
    pub ignore_line_patterns: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            max_lines: 2000,
            context_lines: 3,
            important_file_markers: [
                "main",
                "core",
                "api",
                "service",
                "controller",
                "model",
                "repository",
            ]
            .map(String::from)
            .to_vec(),
            ignore_line_patterns: [
                r"^\s*//",
                r"^\s*#",
                r"^\s*/\*",
                r"^\s*\*",
                r"^\s*\*/",
                r"^\s*$",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

pub(crate) fn is_diff_header(line: &str) -> bool {
    line.starts_with(DIFF_HEADER)
}

#[derive(Debug)]
pub struct Analyzer {
    config: AnalyzerConfig,
    ignore: Vec<Regex>,
}

impl Analyzer {
    /// Compile the configured ignore patterns once.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let ignore = config
            .ignore_line_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| AnalyzerError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer { config, ignore })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The lines the extractor will see: all of them, or the filtered subset
    /// when the diff is longer than `max_lines`.
    pub fn select_lines<'a>(&self, lines: Vec<&'a str>) -> Vec<&'a str> {
        if lines.len() > self.config.max_lines {
            let filtered = filter_important_changes(&lines, &self.config);
            log::info!(
                "large diff ({} lines), kept {} lines after importance filtering",
                lines.len(),
                filtered.len()
            );
            filtered
        } else {
            lines
        }
    }

    /// Reduce `diff` to its per-file change counts.
    pub fn summarize(&self, diff: &str) -> Result<Summary, AnalyzerError> {
        if diff.is_empty() {
            return Err(AnalyzerError::EmptyInput);
        }

        let lines = self.select_lines(split_lines(diff));
        let changes = extract_meaningful_changes(&lines, &self.ignore);
        let summary = generate_summary(&changes);

        log::debug!(
            "{} of {} changed files summarized: {summary}",
            summary.fragments().len(),
            changes.len()
        );
        Ok(summary)
    }

    /// Reduce `diff` and render it into the commit-message prompt.
    pub fn analyze(&self, diff: &str) -> Result<String, AnalyzerError> {
        let summary = self.summarize(diff)?;
        Ok(prompt_builder::commit_message_prompt(&summary.to_string()))
    }
}

/// One-shot form of [`Analyzer::analyze`].
pub fn analyze(diff: &str, config: &AnalyzerConfig) -> Result<String, AnalyzerError> {
    Analyzer::new(config.clone())?.analyze(diff)
}

/// Split on `\n`, keeping empty lines.
pub fn split_lines(diff: &str) -> Vec<&str> {
    diff.split('\n').collect()
}
