//! OpenRouter HTTP client.

use crate::openrouter::{ChatExchange, ChatRequest};
use crate::transport::ChatTransport;
use async_trait::async_trait;
use paisa_core::Credential;
use paisa_error::{HttpError, PaisaResult};
use paisa_rate_limit::PaisaConfig;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenRouter chat-completions client.
///
/// Thin transport: sends the request, reports status, `Retry-After`, and
/// the raw body. Interpreting failures is the classifier's job. The
/// per-attempt timeout is enforced here; its expiry surfaces as a
/// transport error.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    app_title: String,
}

impl OpenRouterClient {
    /// Creates a new OpenRouter client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Chat-completions URL
    /// * `app_title` - Application name sent as the `X-Title` header
    /// * `timeout` - Per-attempt timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(
        endpoint: impl Into<String>,
        app_title: impl Into<String>,
        timeout: Duration,
    ) -> PaisaResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        debug!("Creating new OpenRouter client");
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            app_title: app_title.into(),
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &PaisaConfig) -> PaisaResult<Self> {
        Self::new(
            config.endpoint.url.clone(),
            config.endpoint.app_title.clone(),
            config.dispatch.request_timeout(),
        )
    }
}

#[async_trait]
impl ChatTransport for OpenRouterClient {
    #[instrument(skip(self, credential, request), fields(model = %request.model()))]
    async fn execute(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<ChatExchange, HttpError> {
        debug!("Sending chat completion request with credential {}", credential);

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", credential.expose()))
            .header("X-Title", &self.app_title)
            .json(request)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());

        let body = response
            .text()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read response body: {}", e)))?;

        Ok(ChatExchange::new(status, retry_after_secs, body))
    }
}
