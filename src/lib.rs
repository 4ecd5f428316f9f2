//! diffscribe: condense a diff (or a question plus code context) into a
//! prompt for a hosted language model, then print and copy the answer.

pub mod analyzer;
pub mod cli_args;
pub mod clipboard;
pub mod config;
pub mod essence;
pub mod git;
pub mod interactive;
pub mod llm;
pub mod logging;
pub mod setup;

pub use analyzer::{analyze, Analyzer, AnalyzerConfig, AnalyzerError, Summary};
pub use cli_args::{AskArgs, Cli, Command, CommitArgs};
pub use config::Config;
pub use llm::{strip_wrapping_quotes, LlmClient, PromptKind};
