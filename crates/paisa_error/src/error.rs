//! Top-level error wrapper types.

use crate::{ConfigError, DispatchError, HttpError, InsightError, JsonError};

/// This is the foundation error enum for the Paisa workspace.
///
/// # Examples
///
/// ```
/// use paisa_error::{PaisaError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: PaisaError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PaisaErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Dispatch error
    #[from(DispatchError)]
    Dispatch(DispatchError),
    /// Insight precondition error
    #[from(InsightError)]
    Insight(InsightError),
}

/// Paisa error with kind discrimination.
///
/// # Examples
///
/// ```
/// use paisa_error::{PaisaResult, ConfigError};
///
/// fn might_fail() -> PaisaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Paisa Error: {}", _0)]
pub struct PaisaError(Box<PaisaErrorKind>);

impl PaisaError {
    /// Create a new error from a kind.
    pub fn new(kind: PaisaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PaisaErrorKind {
        &self.0
    }

    /// Get the dispatch error kind, when this error came from the dispatcher.
    ///
    /// Convenience for callers that present retry affordances with wait
    /// estimates.
    pub fn dispatch_kind(&self) -> Option<&crate::DispatchErrorKind> {
        match self.kind() {
            PaisaErrorKind::Dispatch(err) => Some(err.kind()),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to PaisaErrorKind
impl<T> From<T> for PaisaError
where
    T: Into<PaisaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Paisa operations.
///
/// # Examples
///
/// ```
/// use paisa_error::{PaisaResult, HttpError};
///
/// fn fetch_data() -> PaisaResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type PaisaResult<T> = std::result::Result<T, PaisaError>;
