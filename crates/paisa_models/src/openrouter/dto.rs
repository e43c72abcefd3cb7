//! OpenRouter chat-completions data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use paisa_core::RequestOptions;
use serde::{Deserialize, Serialize};

/// Message role on the chat-completions wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// User message
    User,
    /// Assistant message
    Assistant,
    /// System message
    System,
}

/// One message in a chat-completions request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatMessage {
    /// Message role
    role: ChatRole,
    /// Message content
    content: String,
}

impl ChatMessage {
    /// Creates a new builder for `ChatMessage`.
    pub fn builder() -> ChatMessageBuilder {
        ChatMessageBuilder::default()
    }

    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Chat-completions request body.
///
/// The dispatcher always sends a single user-role message containing the
/// fully assembled prompt; conversation history is the host application's
/// concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    temperature: f32,
    /// Maximum tokens to generate
    max_tokens: u32,
}

impl ChatRequest {
    /// Creates a new builder for `ChatRequest`.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }

    /// A single-user-message request for the given model and options.
    pub fn user_prompt(model: impl Into<String>, options: &RequestOptions) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(options.prompt().clone())],
            temperature: *options.temperature(),
            max_tokens: *options.max_tokens(),
        }
    }
}

/// Assistant message inside a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ResponseMessage {
    /// Generated text, absent on some failure shapes
    #[serde(default)]
    content: Option<String>,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Choice {
    /// The generated message
    message: ResponseMessage,
}

/// Successful chat-completions response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CompletionResponse {
    /// Completion choices; the dispatcher only reads the first
    #[serde(default)]
    choices: Vec<Choice>,
}

impl CompletionResponse {
    /// The first choice's text, if present and non-empty.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|content| !content.trim().is_empty())
    }
}

/// Error envelope on failure responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub(crate) error: Option<ApiErrorDetail>,
}

/// Error detail inside the failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// The raw result of one HTTP exchange with the upstream.
///
/// The transport reports status, the `Retry-After` header when present,
/// and the unparsed body; interpretation belongs to
/// [`crate::classify_exchange`] so the two stay independently testable.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ChatExchange {
    /// HTTP status code
    status: u16,
    /// Parsed `Retry-After` header value in seconds, when present
    retry_after_secs: Option<u64>,
    /// Raw response body
    body: String,
}

impl ChatExchange {
    /// Assemble an exchange from its parts.
    pub fn new(status: u16, retry_after_secs: Option<u64>, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after_secs,
            body: body.into(),
        }
    }
}
