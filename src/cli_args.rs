use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::git::DiffSource;

pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "diffscribe",
    version,
    about = "Turns your diff or a question into an LLM prompt, then prints and copies the answer"
)]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Debug mode: log prompts, responses, token usage (same as -vv)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Model name to use (e.g. llama-3.3-70b-versatile). If 'none', acts like --no-model.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Disable model calls; print the prompt that would be sent instead
    #[arg(long, global = true)]
    pub no_model: bool,

    /// API key (otherwise uses GROQ_API_KEY env var or the config file)
    #[arg(long, env = "GROQ_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "DIFFSCRIBE_API_BASE", global = true)]
    pub api_base_url: Option<String>,

    /// Stream the answer to stdout as it is generated
    #[arg(long, global = true)]
    pub stream: bool,

    /// Do not copy the answer to the clipboard
    #[arg(long, global = true)]
    pub no_clipboard: bool,

    /// Diffs longer than this many lines are reduced to their significant changes
    #[arg(long, global = true)]
    pub max_lines: Option<usize>,

    /// Lines of context kept before each significant change
    #[arg(long, global = true)]
    pub context_lines: Option<usize>,

    /// Subcommand; without one an interactive menu is shown
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(2)
        } else {
            self.verbose
        }
    }
}

/// Subcommands, e.g. `diffscribe commit --staged`
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize the current diff and ask the model for a commit message
    Commit(CommitArgs),

    /// Ask a free-form question about the code in a directory
    Ask(AskArgs),

    /// List the models offered by the provider
    Models,
}

#[derive(Args, Debug, Default, Clone)]
#[command(group(
    ArgGroup::new("diff_source")
        .args(["staged", "all", "diff_file"])
        .multiple(false)
))]
pub struct CommitArgs {
    /// Use staged changes (git diff --cached)
    #[arg(long)]
    pub staged: bool,

    /// Use staged and unstaged changes
    #[arg(long)]
    pub all: bool,

    /// Read the diff from a file instead of git ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub diff_file: Option<PathBuf>,

    /// Print the prompt and exit without calling the model
    #[arg(long)]
    pub print_prompt: bool,
}

impl CommitArgs {
    pub fn diff_source(&self) -> DiffSource {
        if self.staged {
            DiffSource::Staged
        } else if self.all {
            DiffSource::All
        } else {
            DiffSource::WorkingTree
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// The question; prompted for interactively when omitted
    pub question: Vec<String>,

    /// Directory to scan for code context
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Also include a summary of the working-tree diff in the context
    #[arg(long)]
    pub with_diff: bool,

    /// Maximum characters of code context sent with the question
    #[arg(long, default_value_t = DEFAULT_MAX_CONTEXT_CHARS)]
    pub max_context_chars: usize,
}

impl Default for AskArgs {
    fn default() -> Self {
        AskArgs {
            question: Vec::new(),
            path: PathBuf::from("."),
            with_diff: false,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }
}

impl AskArgs {
    pub fn question_text(&self) -> Option<String> {
        let text = self.question.join(" ");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_commit_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "diffscribe",
            "commit",
            "--staged",
            "--model",
            "gemma2-9b-it",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.model.as_deref(), Some("gemma2-9b-it"));
        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Some(Command::Commit(args)) => assert_eq!(args.diff_source(), DiffSource::Staged),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn model_and_no_model_conflict() {
        assert!(Cli::try_parse_from(["diffscribe", "--model", "x", "--no-model"]).is_err());
    }

    #[test]
    fn diff_sources_conflict() {
        assert!(Cli::try_parse_from(["diffscribe", "commit", "--staged", "--all"]).is_err());
    }

    #[test]
    fn ask_joins_question_words() {
        let cli = Cli::try_parse_from(["diffscribe", "ask", "what", "does", "main", "do?"]).unwrap();
        match cli.command {
            Some(Command::Ask(args)) => {
                assert_eq!(args.question_text().as_deref(), Some("what does main do?"));
                assert_eq!(args.path, PathBuf::from("."));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn debug_implies_debug_verbosity() {
        let cli = Cli::try_parse_from(["diffscribe", "--debug"]).unwrap();
        assert_eq!(cli.verbosity(), 2);
        assert!(cli.command.is_none());
    }
}
