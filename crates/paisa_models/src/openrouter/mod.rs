//! OpenRouter chat-completions wire types and HTTP client.

mod client;
pub(crate) mod dto;

pub use client::OpenRouterClient;
pub use dto::{
    ChatExchange, ChatMessage, ChatMessageBuilder, ChatRequest, ChatRequestBuilder, ChatRole,
    Choice, CompletionResponse, ResponseMessage,
};
