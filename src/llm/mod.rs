pub mod openai;
pub mod prompt_builder;
mod prompts;
mod stream;

use anyhow::Result;

pub use prompt_builder::PromptKind;

/// Trait for talking to a completion provider.
pub trait LlmClient: Send + Sync {
    /// Model the client sends requests to.
    fn model(&self) -> &str;

    /// Send `prompt` as a single user message and return the reply text.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Model ids offered by the provider, sorted.
    fn list_models(&self) -> Result<Vec<String>>;
}

/// Offline client for `--no-model`: echoes the prompt it would have sent.
pub struct NoopClient;

impl LlmClient for NoopClient {
    fn model(&self) -> &str {
        "none"
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        Ok(format!("[no model] prompt that would be sent:\n{prompt}"))
    }

    fn list_models(&self) -> Result<Vec<String>> {
        Ok(vec!["none".to_string()])
    }
}

/// Remove one layer of surrounding double quotes some models wrap answers in.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed)
}
