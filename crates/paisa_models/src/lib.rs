//! OpenRouter transport and the multi-credential dispatch core.
//!
//! This crate implements the resilient request dispatcher: given a prompt
//! and budgets, it selects a credential (round-robin over the pool) and a
//! model (fixed preference order), throttles the attempt, issues the
//! chat-completions call, classifies the outcome, updates shared
//! rate-limit state, and falls back across the credential×model matrix
//! until an attempt succeeds or every pairing has been tried.
//!
//! The network edge is behind the [`ChatTransport`] trait so the dispatch
//! algorithm is testable with scripted fakes; [`OpenRouterClient`] is the
//! production implementation.
//!
//! # Example
//!
//! ```no_run
//! use paisa_core::RequestOptions;
//! use paisa_models::Dispatcher;
//! use paisa_rate_limit::PaisaConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PaisaConfig::load()?;
//! let dispatcher = Dispatcher::from_config(&config)?;
//!
//! let options = RequestOptions::builder()
//!     .prompt("How am I doing this month?")
//!     .max_tokens(256u32)
//!     .temperature(0.7f32)
//!     .build()?;
//!
//! let text = dispatcher.send(&options).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod dispatcher;
mod openrouter;
mod pool;
mod transport;

pub use classify::{
    CREDENTIAL_EXHAUSTION_MARKERS, Outcome, classify_exchange, mentions_credential_exhaustion,
};
pub use dispatcher::{DispatchTuning, Dispatcher};
pub use openrouter::{
    ChatExchange, ChatMessage, ChatMessageBuilder, ChatRequest, ChatRequestBuilder, ChatRole,
    Choice, CompletionResponse, OpenRouterClient, ResponseMessage,
};
pub use pool::{CredentialPool, ModelPool};
pub use transport::ChatTransport;
