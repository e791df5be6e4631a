//! Chat model seam used to write the comparison report.
//!
//! The crate ships one implementation, [`OpenAiChat`], which talks to any
//! OpenAI-compatible `/chat/completions` endpoint.

mod openai;
mod wire;

pub use openai::OpenAiChat;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("environment variable {0} is not set")]
    MissingApiKey(String),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("chat completion returned HTTP {status}: {message}")]
    Http { status: u32, message: String },
    #[error("malformed chat completion payload")]
    Json(#[from] serde_json::Error),
    #[error("chat completion returned no content")]
    Empty,
}

/// A model that turns a conversation into one reply.
pub trait ChatModel {
    /// Model identifier, for logs.
    fn name(&self) -> &str;

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}
