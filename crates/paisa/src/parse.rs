//! Model reply parsing with a plain-text fallback.
//!
//! Models are instructed to return bare JSON, but in practice replies
//! arrive fenced in markdown, wrapped in prose, or not as JSON at all.
//! Parsing is therefore forgiving: strip an optional code fence, extract
//! the outermost JSON object, and fall back to a sanitized plain-text
//! summary rather than failing the caller.

use paisa_core::AiInsight;
use regex::Regex;
use std::sync::LazyLock;

/// Leading markdown code fence, with an optional `json` language tag.
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```(?:json)?\s*").expect("valid fence regex"));

/// Trailing markdown code fence.
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("valid fence regex"));

/// Outermost brace-delimited block, spanning newlines.
static JSON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid block regex"));

/// Characters stripped from a non-JSON reply before using it as a summary.
static JSON_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\{\}\[\]",]"#).expect("valid punctuation regex"));

/// Runs of whitespace collapsed in the sanitized summary.
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Summary used when sanitizing leaves nothing readable.
const FALLBACK_SUMMARY: &str = "Analysis complete. Check your spending patterns above.";

/// Parse a model reply into a structured insight.
///
/// Never fails: a reply that is not JSON (or not the expected shape)
/// becomes an insight whose summary is the sanitized reply text and whose
/// lists are empty.
///
/// # Examples
///
/// ```
/// use paisa::parse_insight;
///
/// let fenced = "```json\n{\"summary\": \"Doing well\", \"recommendations\": [\"Save more\"]}\n```";
/// let insight = parse_insight(fenced);
/// assert_eq!(insight.summary(), "Doing well");
///
/// let prose = parse_insight("You are doing fine this month.");
/// assert_eq!(prose.summary(), "You are doing fine this month.");
/// assert!(prose.recommendations().is_empty());
/// ```
pub fn parse_insight(text: &str) -> AiInsight {
    let cleaned = strip_fences(text.trim());

    if let Some(block) = JSON_BLOCK.find(&cleaned)
        && let Ok(insight) = serde_json::from_str::<AiInsight>(block.as_str())
    {
        return insight;
    }

    AiInsight::from_summary(sanitize_summary(text))
}

/// Remove a wrapping markdown code fence, if present.
fn strip_fences(text: &str) -> String {
    let without_leading = LEADING_FENCE.replace(text, "");
    TRAILING_FENCE.replace(&without_leading, "").into_owned()
}

/// Reduce a non-JSON reply to a readable one-line summary.
fn sanitize_summary(text: &str) -> String {
    let without_punctuation = JSON_PUNCTUATION.replace_all(text.trim(), " ");
    let collapsed = WHITESPACE.replace_all(&without_punctuation, " ");
    let summary = collapsed.trim().to_string();
    if summary.is_empty() {
        FALLBACK_SUMMARY.to_string()
    } else {
        summary
    }
}
