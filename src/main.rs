use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use diffscribe::cli_args::{AskArgs, Cli, Command, CommitArgs};
use diffscribe::config::Config;
use diffscribe::git::{self, DiffSource};
use diffscribe::interactive::{self, Action};
use diffscribe::llm::prompt_builder;
use diffscribe::llm::LlmClient;
use diffscribe::{clipboard, essence, logging, setup, strip_wrapping_quotes, Analyzer};

/// Read the diff from `--diff-file` (or stdin for "-"), falling back to git.
fn read_diff(args: &CommitArgs) -> Result<String> {
    match &args.diff_file {
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read diff from stdin")?;
            Ok(buf)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read diff file {}", path.display())),
        None => git::diff(args.diff_source()),
    }
}

/// Call the model, with a spinner unless the answer is streamed.
fn complete(llm: &dyn LlmClient, prompt: &str, streaming: bool) -> Result<String> {
    if streaming {
        return llm.complete(prompt);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .context("invalid spinner template")?,
    );
    spinner.set_message(format!("waiting for {}...", llm.model()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = llm.complete(prompt);
    spinner.finish_and_clear();
    result
}

/// Print the answer and copy it to the clipboard.
fn deliver(answer: &str, title: &str, cfg: &Config, streamed: bool) {
    let answer = strip_wrapping_quotes(answer);

    if !streamed {
        let header = format!("----- {title} -----");
        println!();
        println!("{}", header.cyan());
        println!("{answer}");
        println!("{}", "-".repeat(header.len()).cyan());
    }

    if !cfg.clipboard || answer.is_empty() {
        return;
    }
    match clipboard::copy(answer) {
        Ok(()) => eprintln!("{}", "Copied to clipboard.".green()),
        Err(e) => log::warn!("Could not copy to clipboard: {e:#}"),
    }
}

/// Commit mode: summarize the diff and ask for a commit message.
fn run_commit(cli: &Cli, cfg: &Config, args: &CommitArgs, model: Option<&str>) -> Result<()> {
    let analyzer =
        Analyzer::new(cfg.analyzer.clone()).context("invalid analyzer configuration")?;
    let diff = read_diff(args)?;

    let prompt = match analyzer.analyze(&diff) {
        Ok(prompt) => prompt,
        Err(e) => {
            eprintln!("{} {e}", "No changes to summarize:".yellow().bold());
            return Ok(());
        }
    };

    if args.print_prompt {
        println!("{prompt}");
        return Ok(());
    }

    let llm = match model {
        Some(model) => setup::with_model(cli, cfg, model)?,
        None => setup::build_llm_client(cli, cfg)?,
    };
    let streamed = cfg.stream && !cfg.model_disabled(cli);
    let message = complete(llm.as_ref(), &prompt, streamed)?;

    deliver(&message, "Commit Message Preview", cfg, streamed);
    Ok(())
}

/// Question mode: scan the code for context and ask a free-form question.
fn run_ask(cli: &Cli, cfg: &Config, args: &AskArgs, model: Option<&str>) -> Result<()> {
    let question = match args.question_text() {
        Some(q) => q,
        None => interactive::prompt_question()?,
    };
    if question.is_empty() {
        eprintln!("{}", "No question given.".yellow().bold());
        return Ok(());
    }

    let essences = essence::scan_directory(&args.path)?;
    let mut context = essence::render_context(&essences, args.max_context_chars)?;

    if args.with_diff {
        match git::diff(DiffSource::All) {
            Ok(diff) => {
                let analyzer = Analyzer::new(cfg.analyzer.clone())
                    .context("invalid analyzer configuration")?;
                match analyzer.summarize(&diff) {
                    Ok(summary) if !summary.is_empty() => {
                        context.push_str(&format!("\n\nPending changes: {summary}"));
                    }
                    Ok(_) => {}
                    Err(e) => log::info!("No diff context: {e}"),
                }
            }
            Err(e) => log::warn!("Could not read diff for context: {e:#}"),
        }
    }

    let prompt = prompt_builder::question_prompt(&question, &context);

    let llm = match model {
        Some(model) => setup::with_model(cli, cfg, model)?,
        None => setup::build_llm_client(cli, cfg)?,
    };
    let streamed = cfg.stream && !cfg.model_disabled(cli);
    let answer = complete(llm.as_ref(), &prompt, streamed)?;

    deliver(&answer, "Answer", cfg, streamed);
    Ok(())
}

fn run_models(cli: &Cli, cfg: &Config) -> Result<()> {
    let llm = setup::build_llm_client(cli, cfg)?;
    for model in llm.list_models()? {
        println!("{model}");
    }
    Ok(())
}

/// No subcommand: pick an action and a model from menus.
fn run_interactive(cli: &Cli, cfg: &Config) -> Result<()> {
    let action = interactive::choose_action()?;

    let model = if cfg.model_disabled(cli) {
        None
    } else {
        let listed = setup::build_llm_client(cli, cfg).and_then(|llm| llm.list_models());
        match listed {
            Ok(models) if !models.is_empty() => {
                Some(interactive::choose_model(&models, &cfg.model)?)
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("Could not list models, using {}: {e:#}", cfg.model);
                None
            }
        }
    };

    match action {
        Action::CommitMessage => {
            run_commit(cli, cfg, &CommitArgs::default(), model.as_deref())
        }
        Action::Question => run_ask(cli, cfg, &AskArgs::default(), model.as_deref()),
    }
}

fn main() -> Result<()> {
    // `.env` first so clap's env-backed flags can see it.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logger(cli.verbosity());

    let cfg = Config::from_sources(&cli)?;
    log::debug!(
        "model={} base={} max_lines={} context_lines={}",
        cfg.model,
        cfg.api_base_url,
        cfg.analyzer.max_lines,
        cfg.analyzer.context_lines
    );

    match &cli.command {
        Some(Command::Commit(args)) => run_commit(&cli, &cfg, args, None),
        Some(Command::Ask(args)) => run_ask(&cli, &cfg, args, None),
        Some(Command::Models) => run_models(&cli, &cfg),
        None => run_interactive(&cli, &cfg),
    }
}
