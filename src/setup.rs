use anyhow::{anyhow, Result};
use log::debug;

use crate::cli_args::Cli;
use crate::config::Config;
use crate::llm::openai::OpenAiClient;
use crate::llm::{LlmClient, NoopClient};

/// Build the LLM client based on CLI + config.
pub fn build_llm_client(cli: &Cli, cfg: &Config) -> Result<Box<dyn LlmClient>> {
    if cfg.model_disabled(cli) {
        debug!("Using NoopClient (no model calls)");
        return Ok(Box::new(NoopClient));
    }

    let key = cfg.api_key.clone().ok_or_else(|| {
        anyhow!("GROQ_API_KEY (or --api-key) is required unless --no-model or model=none is used")
    })?;

    debug!(
        "Using OpenAiClient with model {} at {}",
        cfg.model, cfg.api_base_url
    );

    Ok(Box::new(OpenAiClient::new(
        key,
        cfg.model.clone(),
        cfg.api_base_url.clone(),
        cfg.stream,
    )?))
}

/// Same client pointed at a different model.
pub fn with_model(cli: &Cli, cfg: &Config, model: &str) -> Result<Box<dyn LlmClient>> {
    let cfg = Config {
        model: model.to_string(),
        ..cfg.clone()
    };
    build_llm_client(cli, &cfg)
}
