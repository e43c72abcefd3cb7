//! The insight engine: prompt in, structured analysis out.

use crate::parse::parse_insight;
use crate::prompt::{build_insight_prompt, build_question_prompt};
use paisa_core::{AiInsight, FinancialSnapshot, RequestOptions};
use paisa_error::{InsightError, PaisaResult};
use paisa_models::Dispatcher;
use paisa_rate_limit::{DispatchConfig, PaisaConfig};
use tracing::{debug, instrument};

/// High-level entry point for AI-assisted financial analysis.
///
/// Wraps one [`Dispatcher`] with the prompt builders, token budgets, and
/// reply parsing. The host application keeps one engine for its lifetime
/// and shares it across features; the dispatcher underneath shares
/// rate-limit state across all of them.
#[derive(Debug)]
pub struct InsightEngine {
    dispatcher: Dispatcher,
    dispatch: DispatchConfig,
}

impl InsightEngine {
    /// Create an engine over an existing dispatcher and tuning.
    pub fn new(dispatcher: Dispatcher, dispatch: DispatchConfig) -> Self {
        Self {
            dispatcher,
            dispatch,
        }
    }

    /// Create a production engine: load configuration, read credentials
    /// from the environment, build the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the HTTP
    /// client cannot be initialized. Missing credentials are not an error
    /// here; they surface on the first generation call.
    pub fn from_env() -> PaisaResult<Self> {
        let config = PaisaConfig::load()?;
        let dispatcher = Dispatcher::from_config(&config)?;
        Ok(Self::new(dispatcher, config.dispatch))
    }

    /// Whether at least one API credential is available.
    pub fn is_configured(&self) -> bool {
        self.dispatcher.is_configured()
    }

    /// The dispatcher backing this engine.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Generate a full structured analysis of the snapshot.
    ///
    /// Builds the analysis prompt, dispatches it with the insight token
    /// budget, and parses the reply. A reply that is not valid JSON still
    /// produces an insight via the plain-text fallback; only dispatch
    /// failures and missing preconditions surface as errors.
    ///
    /// # Errors
    ///
    /// - [`InsightError`] when no credential is configured or the
    ///   snapshot has no transactions to analyze.
    /// - Dispatch errors per [`Dispatcher::send`].
    #[instrument(skip(self, snapshot))]
    pub async fn generate_insights(&self, snapshot: &FinancialSnapshot) -> PaisaResult<AiInsight> {
        if !self.is_configured() {
            return Err(InsightError::new(
                "No OpenRouter API credentials configured. Set OPENROUTER_API_KEY in your \
                 environment or .env file.",
            )
            .into());
        }
        if snapshot.recent().is_empty() {
            return Err(InsightError::new(
                "No transaction data available. Add some transactions to get AI insights.",
            )
            .into());
        }

        let options = self.options(
            build_insight_prompt(snapshot),
            self.dispatch.insight_max_tokens,
        )?;
        let text = self.dispatcher.send(&options).await?;
        debug!("parsing insight reply ({} bytes)", text.len());
        Ok(parse_insight(&text))
    }

    /// Answer a one-off question about the snapshot in plain text.
    ///
    /// # Errors
    ///
    /// - [`InsightError`] when no credential is configured.
    /// - Dispatch errors per [`Dispatcher::send`].
    #[instrument(skip(self, snapshot), fields(question_len = question.len()))]
    pub async fn answer_question(
        &self,
        question: &str,
        snapshot: &FinancialSnapshot,
    ) -> PaisaResult<String> {
        if !self.is_configured() {
            return Err(InsightError::new(
                "No OpenRouter API credentials configured. Set OPENROUTER_API_KEY in your \
                 environment or .env file.",
            )
            .into());
        }

        let options = self.options(
            build_question_prompt(question, snapshot),
            self.dispatch.answer_max_tokens,
        )?;
        let text = self.dispatcher.send(&options).await?;
        Ok(text.trim().to_string())
    }

    /// Assemble request options with the engine's temperature.
    fn options(&self, prompt: String, max_tokens: u32) -> PaisaResult<RequestOptions> {
        RequestOptions::builder()
            .prompt(prompt)
            .max_tokens(max_tokens)
            .temperature(self.dispatch.temperature)
            .build()
            .map_err(|e| InsightError::new(format!("Failed to build request options: {}", e)).into())
    }
}
