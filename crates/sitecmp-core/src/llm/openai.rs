//! OpenAI-compatible chat-completions client over libcurl.

use std::time::Duration;

use super::wire::{ChatCompletionRequest, ChatCompletionResponse, ErrorResponse, Message};
use super::{ChatMessage, ChatModel, LlmError};
use crate::config::LlmConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking client for `POST {base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiChat {
    model: String,
    base_url: String,
    api_key: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiChat {
    pub fn new(cfg: &LlmConfig, api_key: impl Into<String>) -> Self {
        Self {
            model: cfg.model.clone(),
            base_url: cfg.base_url.clone(),
            api_key: api_key.into(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            timeout: cfg.timeout(),
        }
    }

    /// Builds a client with the key from the environment variable named in `cfg`.
    pub fn from_env(cfg: &LlmConfig) -> Result<Self, LlmError> {
        match std::env::var(&cfg.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(cfg, key.trim())),
            _ => Err(LlmError::MissingApiKey(cfg.api_key_env.clone())),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, messages: &[ChatMessage]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.iter().map(Message::from).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Sends `payload` and returns (status, body).
    fn post(&self, url: &str, payload: &[u8]) -> Result<(u32, Vec<u8>), curl::Error> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.post(true)?;
        easy.post_fields_copy(payload)?;
        easy.connect_timeout(CONNECT_TIMEOUT)?;
        easy.timeout(self.timeout)?;

        let mut list = curl::easy::List::new();
        list.append("Content-Type: application/json")?;
        // Send the body right away instead of waiting for 100-continue.
        list.append("Expect:")?;
        list.append(&format!("Authorization: Bearer {}", self.api_key))?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, body))
    }
}

impl ChatModel for OpenAiChat {
    fn name(&self) -> &str {
        &self.model
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let url = self.api_url();
        let payload = serde_json::to_vec(&self.build_request(messages))?;
        tracing::debug!(
            "POST {} model={} messages={} bytes={}",
            url,
            self.model,
            messages.len(),
            payload.len()
        );

        let (status, body) = self.post(&url, &payload).map_err(|source| {
            LlmError::Transport {
                url: url.clone(),
                source,
            }
        })?;

        if !(200..300).contains(&status) {
            return Err(LlmError::Http {
                status,
                message: error_message(&body),
            });
        }

        parse_completion(&body)
    }
}

/// Extracts the first choice's text from a successful response body.
fn parse_completion(body: &[u8]) -> Result<String, LlmError> {
    let resp: ChatCompletionResponse = serde_json::from_slice(body)?;
    if let Some(usage) = &resp.usage {
        tracing::info!(
            "chat completion used {} prompt + {} completion tokens",
            usage.prompt_tokens,
            usage.completion_tokens
        );
    }
    let choice = resp.choices.into_iter().next().ok_or(LlmError::Empty)?;
    if let Some(reason) = choice.finish_reason.as_deref() {
        if reason != "stop" {
            tracing::warn!("chat completion finished with reason {}", reason);
        }
    }
    match choice.message.content {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(LlmError::Empty),
    }
}

/// Best-effort message from an error body: the API's `error.message`, else the raw text.
fn error_message(body: &[u8]) -> String {
    if let Ok(e) = serde_json::from_slice::<ErrorResponse>(body) {
        return e.error.message;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "<empty body>".to_string()
    } else {
        text.chars().take(200).collect()
    }
}
