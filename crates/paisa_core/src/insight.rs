//! Structured insight returned by the AI.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A structured financial analysis produced by the model.
///
/// Every field defaults to empty on deserialization so a partially
/// conforming model reply still parses; the insight layer falls back to a
/// plain-text summary when the reply is not JSON at all.
///
/// # Examples
///
/// ```
/// use paisa_core::AiInsight;
///
/// let json = r#"{"summary": "Healthy month", "recommendations": ["Start a SIP"]}"#;
/// let insight: AiInsight = serde_json::from_str(json).unwrap();
/// assert_eq!(insight.summary(), "Healthy month");
/// assert_eq!(insight.recommendations().len(), 1);
/// assert!(insight.warnings().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters, Default)]
#[builder(setter(into), default)]
pub struct AiInsight {
    /// Overall assessment, two to three sentences
    #[serde(default)]
    summary: String,
    /// Actionable advice bullets
    #[serde(default)]
    recommendations: Vec<String>,
    /// Concerning patterns or risks
    #[serde(default)]
    warnings: Vec<String>,
    /// Ways to save more or grow wealth
    #[serde(default)]
    opportunities: Vec<String>,
}

impl AiInsight {
    /// Creates a new builder for `AiInsight`.
    pub fn builder() -> AiInsightBuilder {
        AiInsightBuilder::default()
    }

    /// An insight carrying only a plain-text summary.
    ///
    /// Used as the fallback when the model reply cannot be parsed as JSON.
    pub fn from_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }
}
