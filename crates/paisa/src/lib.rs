//! Paisa - AI-assisted financial insights with resilient dispatch.
//!
//! Paisa turns a financial snapshot (totals, top spending, recent
//! transactions, goals, budgets) into a structured AI analysis or a short
//! conversational answer. Requests fan out across multiple API credentials
//! and multiple models with shared rate-limit tracking, so a throttled key
//! or a contended model degrades service gracefully instead of failing it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use paisa::{FinancialSnapshot, InsightEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = InsightEngine::from_env()?;
//!     let snapshot: FinancialSnapshot =
//!         serde_json::from_str(&std::fs::read_to_string("snapshot.json")?)?;
//!
//!     let insight = engine.generate_insights(&snapshot).await?;
//!     println!("{}", insight.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Paisa is organized as a workspace with focused crates:
//!
//! - `paisa_error` - Error types
//! - `paisa_core` - Core data types (snapshot, insight, credential)
//! - `paisa_rate_limit` - Rate-limit tracking, throttling, configuration
//! - `paisa_models` - OpenRouter transport and the dispatch core
//!
//! This crate (`paisa`) re-exports everything for convenience and adds the
//! insight layer: prompt construction, reply parsing with a plain-text
//! fallback, offline rule-based insights, and a small CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod insights;
mod local;
mod parse;
mod prompt;

pub use insights::InsightEngine;
pub use local::local_insights;
pub use parse::parse_insight;
pub use prompt::{build_insight_prompt, build_question_prompt, format_inr};

// Re-export the underlying crates' public APIs
pub use paisa_core::{
    AiInsight, BudgetStatus, CategorySpend, Credential, DaySpend, FinancialSnapshot, GoalProgress,
    RecentTransaction, RequestOptions, SnapshotTotals,
};
pub use paisa_error::{
    ConfigError, DispatchError, DispatchErrorKind, HttpError, InsightError, JsonError, PaisaError,
    PaisaErrorKind, PaisaResult,
};
pub use paisa_models::{
    ChatExchange, ChatRequest, ChatTransport, DispatchTuning, Dispatcher, OpenRouterClient,
    classify_exchange, mentions_credential_exhaustion,
};
pub use paisa_rate_limit::{
    CREDENTIAL_ENV, DispatchConfig, PaisaConfig, RateLimitTracker, RequestThrottle, Subject,
    credentials_from_env, is_configured,
};
