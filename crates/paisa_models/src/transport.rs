//! Transport seam between the dispatcher and the network.

use crate::openrouter::{ChatExchange, ChatRequest};
use async_trait::async_trait;
use paisa_core::Credential;
use paisa_error::HttpError;

/// One-shot chat-completions transport.
///
/// Implementations perform exactly one HTTP exchange per call and report
/// the raw result. An `Err` means the exchange never completed at the
/// transport level (connect failure, DNS, timeout) and must not implicate
/// the credential or model used; HTTP-level failures come back as an
/// `Ok(ChatExchange)` with a non-2xx status for the classifier to
/// interpret.
///
/// The dispatcher holds the transport behind `Arc<dyn ChatTransport>`, so
/// tests drive the retry loop with scripted fakes.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Execute one exchange with the given credential.
    async fn execute(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<ChatExchange, HttpError>;
}
