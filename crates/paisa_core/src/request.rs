//! Per-request options consumed by the dispatcher.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Options for one logical dispatch request.
///
/// The prompt is treated as an opaque string; the dispatcher never inspects
/// it. Token budget and temperature are passed through to the upstream
/// unchanged.
///
/// # Examples
///
/// ```
/// use paisa_core::RequestOptions;
///
/// let options = RequestOptions::builder()
///     .prompt("Summarize my spending")
///     .max_tokens(256u32)
///     .temperature(0.7f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(*options.max_tokens(), 256);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct RequestOptions {
    /// The fully assembled prompt text
    prompt: String,
    /// Maximum number of tokens the model may generate
    max_tokens: u32,
    /// Sampling temperature
    temperature: f32,
}

impl RequestOptions {
    /// Creates a new builder for `RequestOptions`.
    pub fn builder() -> RequestOptionsBuilder {
        RequestOptionsBuilder::default()
    }
}
