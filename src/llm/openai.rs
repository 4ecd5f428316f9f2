use super::LlmClient;
use super::stream::read_stream_to_string;
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use std::io::BufReader;
use std::time::Duration;

/// Groq's OpenAI-compatible endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Minimal request/response structs for the Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// OpenAI-compatible implementation of LlmClient (Groq by default).
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
    stream: bool,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, api_base_url: String, stream: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .context("failed to build HTTP client")?;

        Ok(OpenAiClient {
            client,
            api_key,
            model,
            api_base_url: normalize_base_url(&api_base_url),
            stream,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.api_base_url)
    }

    fn send_chat(&self, req: &ChatRequest) -> Result<Response> {
        let resp = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .context("failed to send request to the completion API")?;

        ensure_success(resp)
    }

    fn call_chat(&self, req: &ChatRequest) -> Result<String> {
        log::info!("Calling model {:?}", req.model);

        let chat_resp: ChatResponse = self
            .send_chat(req)?
            .json()
            .context("failed to parse completion response")?;

        if let Some(usage) = &chat_resp.usage {
            log::info!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        chat_resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("no choices returned from the completion API"))
    }

    fn call_chat_streaming(&self, req: &ChatRequest) -> Result<String> {
        log::info!("Streaming model {:?}", req.model);

        let reader = BufReader::new(self.send_chat(req)?);
        read_stream_to_string(reader, parse_stream_line)
    }
}

impl LlmClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        log::debug!("Prompt:\n{}", truncate(prompt, 3000));

        let req = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: self.stream,
        };

        if req.stream {
            self.call_chat_streaming(&req)
        } else {
            self.call_chat(&req)
        }
    }

    fn list_models(&self) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .send()
            .context("failed to request the model list")?;

        let body = ensure_success(resp)?
            .text()
            .context("failed to read the model list")?;

        parse_model_list(&body)
    }
}

fn ensure_success(resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    Err(anyhow!(
        "completion API error: HTTP {} - {}",
        status.as_u16(),
        text
    ))
}

/// Accept both `https://host/openai/v1` and `https://host` style bases.
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with("/v1") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}

fn parse_model_list(body: &str) -> Result<Vec<String>> {
    let list: ModelList =
        serde_json::from_str(body).context("unexpected model list response format")?;
    let mut models: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
    models.sort();
    Ok(models)
}

fn parse_stream_line(line: &str) -> Result<Option<String>> {
    let line = line.trim_start();
    if !line.starts_with("data:") {
        return Ok(None);
    }

    let data = line.trim_start_matches("data:").trim();
    if data == "[DONE]" {
        return Ok(None);
    }

    let chunk: StreamResponse =
        serde_json::from_str(data).context("failed to parse streaming chunk")?;
    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content);

    Ok(content)
}

/// Truncate long strings for debug logging.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...\n[truncated {} chars]", &s[..end], s.len() - end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_v1_once() {
        assert_eq!(
            normalize_base_url("https://api.groq.com/openai/v1/"),
            "https://api.groq.com/openai/v1"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080"),
            "http://localhost:8080/v1"
        );
    }

    #[test]
    fn model_list_is_sorted_ids() {
        let body = r#"{"object":"list","data":[
            {"id":"mixtral-8x7b-32768","owned_by":"mistral"},
            {"id":"gemma2-9b-it","owned_by":"google"},
            {"id":"llama-3.3-70b-versatile","owned_by":"meta"}
        ]}"#;
        assert_eq!(
            parse_model_list(body).unwrap(),
            vec!["gemma2-9b-it", "llama-3.3-70b-versatile", "mixtral-8x7b-32768"]
        );
    }

    #[test]
    fn model_list_without_data_is_an_error() {
        assert!(parse_model_list(r#"{"error":"nope"}"#).is_err());
    }

    #[test]
    fn stream_lines() {
        assert_eq!(
            parse_stream_line(r#"data: {"choices":[{"delta":{"content":"Add"}}]}"#).unwrap(),
            Some("Add".to_string())
        );
        assert_eq!(
            parse_stream_line(r#"data: {"choices":[{"delta":{}}]}"#).unwrap(),
            None
        );
        assert_eq!(parse_stream_line("data: [DONE]").unwrap(), None);
        assert_eq!(parse_stream_line(": keep-alive").unwrap(), None);
        assert!(parse_stream_line("data: {not json").is_err());
    }

    #[test]
    fn chat_request_shape() {
        let req = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            stream: false,
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"model":"m","messages":[{"role":"user","content":"hi"}],"stream":false}"#
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        let out = truncate("héllo", 2);
        assert!(out.starts_with("h..."));
    }
}
