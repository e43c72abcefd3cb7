//! Insight generation precondition errors.

/// Error raised when insight generation cannot start.
///
/// Distinct from [`crate::DispatchError`]: these are precondition failures
/// (no credentials configured, no transaction data to analyze) detected
/// before any network attempt is made.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Insight Error: {} at line {} in {}", message, line, file)]
pub struct InsightError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl InsightError {
    /// Create a new InsightError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
