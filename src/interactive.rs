use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Select};

/// What the user wants to do when no subcommand was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CommitMessage,
    Question,
}

impl Action {
    const ALL: [Action; 2] = [Action::CommitMessage, Action::Question];

    fn label(&self) -> &'static str {
        match self {
            Action::CommitMessage => "Write a commit message for the current diff",
            Action::Question => "Ask a question about this codebase",
        }
    }
}

pub fn choose_action() -> Result<Action> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What would you like to do?")
        .default(0)
        .items(&labels)
        .interact()
        .context("failed to read menu selection")?;

    Ok(Action::ALL[selection])
}

/// Index of `preferred` in `models`, or 0 when it is not offered.
pub fn default_model_index(models: &[String], preferred: &str) -> usize {
    models.iter().position(|m| m == preferred).unwrap_or(0)
}

pub fn choose_model(models: &[String], preferred: &str) -> Result<String> {
    if models.len() == 1 {
        return Ok(models[0].clone());
    }

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which model?")
        .default(default_model_index(models, preferred))
        .items(models)
        .max_length(15)
        .interact()
        .context("failed to read model selection")?;

    Ok(models[selection].clone())
}

pub fn prompt_question() -> Result<String> {
    let question: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Your question")
        .interact_text()
        .context("failed to read question")?;

    Ok(question.trim().to_string())
}
