//! Outcome classification for chat-completions exchanges.
//!
//! Turns a raw [`ChatExchange`] into one [`Outcome`] the dispatcher acts
//! on. Classification is pure and synchronous, so the failure taxonomy is
//! testable without any transport in the loop.

use crate::openrouter::ChatExchange;
use crate::openrouter::dto::ApiErrorBody;
use std::time::Duration;

/// How much of a failure body is quoted in error messages.
const MESSAGE_SNIPPET_LEN: usize = 200;

/// Substrings that mark a 429 as account exhaustion rather than
/// model contention.
///
/// This is a heuristic: the upstream reports both conditions as 429 and
/// distinguishes them only in prose. A 429 whose message mentions none of
/// these markers blocks the model alone and leaves the credential usable
/// with other models. The generic phrase "rate limit" is excluded even
/// though it contains "limit": it describes per-minute pacing, not an
/// exhausted account.
pub const CREDENTIAL_EXHAUSTION_MARKERS: [&str; 3] = ["credit", "quota", "limit"];

/// Whether a 429 error message indicates the credential itself is
/// exhausted.
///
/// Ambiguous wording falls back to model-only blocking.
///
/// # Examples
///
/// ```
/// use paisa_models::mentions_credential_exhaustion;
///
/// assert!(mentions_credential_exhaustion("Quota exceeded for this key"));
/// assert!(mentions_credential_exhaustion("You are out of credits"));
/// assert!(mentions_credential_exhaustion("Daily limit reached"));
/// assert!(!mentions_credential_exhaustion("rate limit exceeded"));
/// assert!(!mentions_credential_exhaustion("Model is overloaded"));
/// ```
pub fn mentions_credential_exhaustion(message: &str) -> bool {
    let message = message.to_lowercase();
    if message.contains("credit") || message.contains("quota") {
        return true;
    }
    message.contains("limit") && !message.contains("rate limit")
}

/// Classified result of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx with usable text
    Success(String),
    /// 2xx without usable text; retried like a failure
    Empty,
    /// 429: the model is contended, and possibly the credential exhausted
    RateLimited {
        /// Parsed `Retry-After`, when the upstream supplied one
        retry_after: Option<Duration>,
        /// Whether the message matched a credential-exhaustion marker
        exhausts_credential: bool,
        /// Upstream error message
        message: String,
    },
    /// 401: the credential is invalid and will not heal soon
    Unauthorized {
        /// Upstream error message
        message: String,
    },
    /// Any other non-2xx status; transient, no blocking side effect
    Upstream {
        /// HTTP status code
        status: u16,
        /// Upstream error message
        message: String,
    },
}

/// Classify one exchange.
pub fn classify_exchange(exchange: &ChatExchange) -> Outcome {
    let status = *exchange.status();

    if (200..300).contains(&status) {
        return match serde_json::from_str::<crate::openrouter::CompletionResponse>(exchange.body())
        {
            Ok(response) => match response.first_content() {
                Some(content) => Outcome::Success(content.to_string()),
                None => Outcome::Empty,
            },
            // A 2xx we cannot parse carries no usable text
            Err(_) => Outcome::Empty,
        };
    }

    let message = error_message(exchange.body());
    match status {
        429 => Outcome::RateLimited {
            retry_after: (*exchange.retry_after_secs()).map(Duration::from_secs),
            exhausts_credential: mentions_credential_exhaustion(&message),
            message,
        },
        401 => Outcome::Unauthorized { message },
        _ => Outcome::Upstream { status, message },
    }
}

/// Extract a human-readable message from a failure body.
///
/// Prefers the structured `error.message` field; falls back to a trimmed
/// snippet of the raw body.
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorBody>(body)
        && let Some(message) = envelope.error.and_then(|detail| detail.message)
        && !message.is_empty()
    {
        return message;
    }

    let trimmed = body.trim();
    trimmed.chars().take(MESSAGE_SNIPPET_LEN).collect()
}
