//! Dispatch error types and retry classification.

use std::fmt;

/// Specific dispatch error conditions.
///
/// Recoverable kinds are handled inside the dispatcher's retry loop and
/// never cross the component boundary on their own; they surface only as
/// the `last` payload of [`DispatchErrorKind::AttemptsExhausted`]. The
/// exhaustion kinds carry a wait estimate in whole seconds so callers can
/// offer a retry affordance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DispatchErrorKind {
    /// No API credentials are configured.
    NoCredentials,
    /// Every credential is currently rate limited.
    CredentialsExhausted {
        /// Seconds until the soonest credential unblocks
        wait_secs: u64,
    },
    /// Every model is currently rate limited.
    ModelsExhausted {
        /// Seconds until the soonest model unblocks
        wait_secs: u64,
    },
    /// Every credential and every model is currently rate limited.
    ResourcesExhausted {
        /// Seconds until the soonest subject in either pool unblocks
        wait_secs: u64,
    },
    /// The upstream returned 429 for one attempt.
    RateLimited {
        /// Error message reported by the upstream, if any
        message: String,
    },
    /// The upstream rejected the credential with 401.
    InvalidCredential,
    /// The upstream replied successfully but with no usable text.
    EmptyResponse,
    /// The upstream returned a non-2xx status other than 429/401.
    Upstream {
        /// HTTP status code
        status: u16,
        /// Error message reported by the upstream, if any
        message: String,
    },
    /// The request never completed at the transport level.
    Network(String),
    /// Every distinct credential/model pairing was attempted without success.
    AttemptsExhausted {
        /// The last recoverable error observed, if any was recorded
        last: Option<Box<DispatchErrorKind>>,
    },
}

impl DispatchErrorKind {
    /// Check if the dispatcher should keep trying other pairings after
    /// this error.
    ///
    /// Transient per-attempt failures (429, 401, empty replies, upstream
    /// and network errors) return true. Terminal conditions (no
    /// credentials, exhausted pools, exhausted attempts) return false.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DispatchErrorKind::RateLimited { .. }
                | DispatchErrorKind::InvalidCredential
                | DispatchErrorKind::EmptyResponse
                | DispatchErrorKind::Upstream { .. }
                | DispatchErrorKind::Network(_)
        )
    }

    /// Wait estimate in seconds for rate-limit exhaustion kinds.
    ///
    /// Returns `None` for kinds that carry no wait estimate.
    pub fn wait_secs(&self) -> Option<u64> {
        match self {
            DispatchErrorKind::CredentialsExhausted { wait_secs }
            | DispatchErrorKind::ModelsExhausted { wait_secs }
            | DispatchErrorKind::ResourcesExhausted { wait_secs } => Some(*wait_secs),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchErrorKind::NoCredentials => {
                write!(f, "No API credentials configured")
            }
            DispatchErrorKind::CredentialsExhausted { wait_secs } => {
                write!(
                    f,
                    "All API credentials are rate limited; retry in {} second(s)",
                    wait_secs
                )
            }
            DispatchErrorKind::ModelsExhausted { wait_secs } => {
                write!(
                    f,
                    "All models are rate limited; retry in {} second(s)",
                    wait_secs
                )
            }
            DispatchErrorKind::ResourcesExhausted { wait_secs } => {
                write!(
                    f,
                    "All credentials and models are rate limited; retry in {} second(s)",
                    wait_secs
                )
            }
            DispatchErrorKind::RateLimited { message } => {
                if message.is_empty() {
                    write!(f, "Rate limited")
                } else {
                    write!(f, "Rate limited: {}", message)
                }
            }
            DispatchErrorKind::InvalidCredential => write!(f, "Invalid API credential"),
            DispatchErrorKind::EmptyResponse => write!(f, "Empty response from model"),
            DispatchErrorKind::Upstream { status, message } => {
                if message.is_empty() {
                    write!(f, "API error: {}", status)
                } else {
                    write!(f, "API error {}: {}", status, message)
                }
            }
            DispatchErrorKind::Network(msg) => write!(f, "Network error: {}", msg),
            DispatchErrorKind::AttemptsExhausted { last } => match last {
                Some(last) => write!(f, "All attempts failed; last error: {}", last),
                None => write!(f, "All attempts failed"),
            },
        }
    }
}

/// Dispatch error with source location tracking.
///
/// # Examples
///
/// ```
/// use paisa_error::{DispatchError, DispatchErrorKind};
///
/// let err = DispatchError::new(DispatchErrorKind::NoCredentials);
/// assert!(format!("{}", err).contains("No API credentials"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Dispatch Error: {} at line {} in {}", kind, line, file)]
pub struct DispatchError {
    kind: DispatchErrorKind,
    line: u32,
    file: &'static str,
}

impl DispatchError {
    /// Create a new DispatchError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DispatchErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DispatchErrorKind {
        &self.kind
    }

    /// Consume the error, returning its kind.
    pub fn into_kind(self) -> DispatchErrorKind {
        self.kind
    }
}

impl From<DispatchErrorKind> for DispatchError {
    #[track_caller]
    fn from(kind: DispatchErrorKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_kinds() {
        assert!(
            DispatchErrorKind::RateLimited {
                message: String::new()
            }
            .is_recoverable()
        );
        assert!(DispatchErrorKind::InvalidCredential.is_recoverable());
        assert!(DispatchErrorKind::EmptyResponse.is_recoverable());
        assert!(
            DispatchErrorKind::Upstream {
                status: 500,
                message: "oops".to_string()
            }
            .is_recoverable()
        );
        assert!(DispatchErrorKind::Network("refused".to_string()).is_recoverable());
    }

    #[test]
    fn terminal_kinds() {
        assert!(!DispatchErrorKind::NoCredentials.is_recoverable());
        assert!(!DispatchErrorKind::CredentialsExhausted { wait_secs: 5 }.is_recoverable());
        assert!(!DispatchErrorKind::ModelsExhausted { wait_secs: 5 }.is_recoverable());
        assert!(!DispatchErrorKind::ResourcesExhausted { wait_secs: 5 }.is_recoverable());
        assert!(!DispatchErrorKind::AttemptsExhausted { last: None }.is_recoverable());
    }

    #[test]
    fn wait_estimate_surfaces_for_exhaustion() {
        assert_eq!(
            DispatchErrorKind::ModelsExhausted { wait_secs: 42 }.wait_secs(),
            Some(42)
        );
        assert_eq!(DispatchErrorKind::EmptyResponse.wait_secs(), None);
    }

    #[test]
    fn attempts_exhausted_reports_last_error() {
        let kind = DispatchErrorKind::AttemptsExhausted {
            last: Some(Box::new(DispatchErrorKind::Upstream {
                status: 503,
                message: "unavailable".to_string(),
            })),
        };
        let rendered = format!("{}", kind);
        assert!(rendered.contains("All attempts failed"));
        assert!(rendered.contains("503"));
    }
}
