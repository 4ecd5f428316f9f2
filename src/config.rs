use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::AnalyzerConfig;
use crate::cli_args::Cli;
use crate::llm::openai::DEFAULT_API_BASE_URL;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Final resolved configuration for diffscribe.
#[derive(Debug, Clone)]
pub struct Config {
    /// Required only when a model is actually called.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub stream: bool,
    pub clipboard: bool,
    pub analyzer: AnalyzerConfig,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--api-key`, ...)
    ///   2. Env vars `DIFFSCRIBE_MODEL`, `GROQ_API_KEY`, `DIFFSCRIBE_API_BASE`
    ///   3. TOML `~/.config/diffscribe.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Result<Self> {
        let file_cfg = match config_path() {
            Some(path) if path.exists() => load_file_config(&path)?,
            _ => FileConfig::default(),
        };

        Ok(Self::resolve(cli, file_cfg, |key| env::var(key).ok()))
    }

    /// Merge the sources; `env` looks up an environment variable.
    pub fn resolve<F>(cli: &Cli, file_cfg: FileConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = cli
            .model
            .clone()
            .or_else(|| env("DIFFSCRIBE_MODEL"))
            .or(file_cfg.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| env("GROQ_API_KEY"))
            .or(file_cfg.api_key)
            .filter(|k| !k.trim().is_empty());

        let api_base_url = cli
            .api_base_url
            .clone()
            .or_else(|| env("DIFFSCRIBE_API_BASE"))
            .or(file_cfg.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let stream = cli.stream || file_cfg.stream.unwrap_or(false);
        let clipboard = !cli.no_clipboard && file_cfg.clipboard.unwrap_or(true);

        let mut analyzer = file_cfg.analyzer.unwrap_or_default().apply(AnalyzerConfig::default());
        if let Some(max_lines) = cli.max_lines {
            analyzer.max_lines = max_lines;
        }
        if let Some(context_lines) = cli.context_lines {
            analyzer.context_lines = context_lines;
        }

        Config {
            api_key,
            model,
            api_base_url,
            stream,
            clipboard,
            analyzer,
        }
    }

    /// `--no-model` or a model named "none".
    pub fn model_disabled(&self, cli: &Cli) -> bool {
        cli.no_model || self.model.eq_ignore_ascii_case("none")
    }
}

/// Contents of `~/.config/diffscribe.toml`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub stream: Option<bool>,
    pub clipboard: Option<bool>,
    pub analyzer: Option<FileAnalyzerConfig>,
}

/// `[analyzer]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileAnalyzerConfig {
    pub max_lines: Option<usize>,
    pub context_lines: Option<usize>,
    pub important_file_markers: Option<Vec<String>>,
    pub ignore_line_patterns: Option<Vec<String>>,
}

impl FileAnalyzerConfig {
    fn apply(self, base: AnalyzerConfig) -> AnalyzerConfig {
        AnalyzerConfig {
            max_lines: self.max_lines.unwrap_or(base.max_lines),
            context_lines: self.context_lines.unwrap_or(base.context_lines),
            important_file_markers: self
                .important_file_markers
                .unwrap_or(base.important_file_markers),
            ignore_line_patterns: self.ignore_line_patterns.unwrap_or(base.ignore_line_patterns),
        }
    }
}

/// Return `~/.config/diffscribe.toml`
pub fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("diffscribe.toml"))
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_file_config(&data).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse_file_config(data: &str) -> Result<FileConfig> {
    Ok(toml::from_str::<FileConfig>(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["diffscribe"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let mut c = cli(&[]);
        c.api_key = None;
        c.api_base_url = None;
        let cfg = Config::resolve(&c, FileConfig::default(), env_from(&[]));

        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.api_key, None);
        assert!(cfg.clipboard);
        assert!(!cfg.stream);
        assert_eq!(cfg.analyzer, AnalyzerConfig::default());
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = FileConfig {
            model: Some("from-file".into()),
            api_key: Some("file-key".into()),
            ..FileConfig::default()
        };
        let env = env_from(&[("DIFFSCRIBE_MODEL", "from-env")]);

        let mut c = cli(&[]);
        c.api_key = None;
        let cfg = Config::resolve(&c, file, env);
        assert_eq!(cfg.model, "from-env");
        assert_eq!(cfg.api_key.as_deref(), Some("file-key"));

        let c = cli(&["--model", "from-cli"]);
        let env = env_from(&[("DIFFSCRIBE_MODEL", "from-env")]);
        let cfg = Config::resolve(&c, FileConfig::default(), env);
        assert_eq!(cfg.model, "from-cli");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut c = cli(&[]);
        c.api_key = Some("  ".into());
        let cfg = Config::resolve(&c, FileConfig::default(), env_from(&[]));
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn analyzer_table_and_cli_overrides() {
        let file = parse_file_config(
            r#"
            model = "gemma2-9b-it"
            clipboard = false

            [analyzer]
            max_lines = 50
            context_lines = 1
            important_file_markers = ["handler"]
            "#,
        )
        .unwrap();

        let c = cli(&["--context-lines", "5"]);
        let cfg = Config::resolve(&c, file, env_from(&[]));

        assert_eq!(cfg.analyzer.max_lines, 50);
        assert_eq!(cfg.analyzer.context_lines, 5);
        assert_eq!(cfg.analyzer.important_file_markers, vec!["handler"]);
        assert_eq!(
            cfg.analyzer.ignore_line_patterns,
            AnalyzerConfig::default().ignore_line_patterns
        );
        assert!(!cfg.clipboard);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_file_config("modle = \"typo\"").is_err());
    }

    #[test]
    fn model_none_disables_calls() {
        let c = cli(&["--model", "None"]);
        let cfg = Config::resolve(&c, FileConfig::default(), env_from(&[]));
        assert!(cfg.model_disabled(&c));

        let c = cli(&["--no-model"]);
        let cfg = Config::resolve(&c, FileConfig::default(), env_from(&[]));
        assert!(cfg.model_disabled(&c));
    }
}
