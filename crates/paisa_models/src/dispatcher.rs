//! The resilient request dispatcher.
//!
//! One logical request fans out over the credential×model matrix: each
//! attempt uses a rotating credential and the most preferred available
//! model, waits its turn at the process-wide throttle, and classifies the
//! outcome into shared rate-limit state. Recoverable failures move on to
//! the next untried pairing; the loop is bounded by the number of distinct
//! pairings, so it always terminates.

use crate::classify::{Outcome, classify_exchange};
use crate::openrouter::{ChatRequest, OpenRouterClient};
use crate::pool::{CredentialPool, ModelPool};
use crate::transport::ChatTransport;
use paisa_core::{Credential, RequestOptions};
use paisa_error::{DispatchError, DispatchErrorKind, PaisaResult};
use paisa_rate_limit::{
    DispatchConfig, PaisaConfig, RateLimitTracker, RequestThrottle, Subject, credentials_from_env,
    secs_ceil,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Block durations applied on failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTuning {
    /// Block duration for 429s without a Retry-After header
    pub default_retry_after: Duration,
    /// Block duration for credentials rejected with 401
    pub invalid_credential_block: Duration,
}

impl Default for DispatchTuning {
    fn default() -> Self {
        Self {
            default_retry_after: Duration::from_secs(60),
            invalid_credential_block: Duration::from_secs(3600),
        }
    }
}

impl From<&DispatchConfig> for DispatchTuning {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            default_retry_after: config.default_retry_after(),
            invalid_credential_block: config.invalid_credential_block(),
        }
    }
}

/// One credential/model combination committed for an attempt.
struct Pairing {
    credential: Credential,
    model: String,
}

/// Why no pairing could be produced.
enum SelectionFailure {
    /// A pool (or both) is fully rate limited; terminal for this request
    Terminal(DispatchErrorKind),
    /// Every currently eligible pairing was already attempted
    AllTried,
}

/// The multi-credential, multi-model request dispatcher.
///
/// Owns the credential and model pools and the shared rate-limit state.
/// Constructing a fresh dispatcher resets all rate-limit and throttle
/// state; the host application is expected to keep one instance for its
/// lifetime and share it across concurrent logical requests.
pub struct Dispatcher {
    credentials: CredentialPool,
    models: ModelPool,
    tracker: Arc<RateLimitTracker>,
    throttle: Arc<RequestThrottle>,
    transport: Arc<dyn ChatTransport>,
    tuning: DispatchTuning,
}

impl Dispatcher {
    /// Create a dispatcher over explicit pools and transport.
    pub fn new(
        credentials: Vec<Credential>,
        models: Vec<String>,
        transport: Arc<dyn ChatTransport>,
        min_request_interval: Duration,
        tuning: DispatchTuning,
    ) -> Self {
        Self {
            credentials: CredentialPool::new(credentials),
            models: ModelPool::new(models),
            tracker: Arc::new(RateLimitTracker::new()),
            throttle: Arc::new(RequestThrottle::new(min_request_interval)),
            transport,
            tuning,
        }
    }

    /// Create a production dispatcher from the loaded configuration.
    ///
    /// Credentials come from the environment; the model pool, throttle
    /// interval, and block durations come from the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn from_config(config: &PaisaConfig) -> PaisaResult<Self> {
        let transport = Arc::new(OpenRouterClient::from_config(config)?);
        Ok(Self::new(
            credentials_from_env(),
            config.models.preference.clone(),
            transport,
            config.dispatch.min_request_interval(),
            DispatchTuning::from(&config.dispatch),
        ))
    }

    /// Whether at least one credential is available to dispatch with.
    pub fn is_configured(&self) -> bool {
        !self.credentials.is_empty()
    }

    /// The shared rate-limit tracker.
    pub fn tracker(&self) -> &RateLimitTracker {
        &self.tracker
    }

    /// Dispatch one logical request, retrying across pairings as needed.
    ///
    /// Tries each distinct credential/model pairing at most once, in
    /// rotating-credential × preference-model order, skipping subjects
    /// that are rate limited. Returns the first non-empty reply text.
    ///
    /// # Errors
    ///
    /// - [`DispatchErrorKind::NoCredentials`] when the pool is empty.
    /// - [`DispatchErrorKind::CredentialsExhausted`] /
    ///   [`DispatchErrorKind::ModelsExhausted`] /
    ///   [`DispatchErrorKind::ResourcesExhausted`] when rate limits leave
    ///   nothing eligible, with a wait estimate in seconds.
    /// - [`DispatchErrorKind::AttemptsExhausted`] when every pairing was
    ///   tried without success, wrapping the last recoverable error.
    #[instrument(skip(self, options), fields(max_tokens = %options.max_tokens()))]
    pub async fn send(&self, options: &RequestOptions) -> PaisaResult<String> {
        if self.credentials.is_empty() {
            return Err(DispatchError::new(DispatchErrorKind::NoCredentials).into());
        }

        // Upper bound on distinct pairings; skips never consume budget.
        let max_attempts = self.credentials.len() * self.models.len();
        let mut tried: HashSet<(String, String)> = HashSet::new();
        let mut last_error: Option<DispatchErrorKind> = None;

        while tried.len() < max_attempts {
            let pairing = match self.next_pairing(&tried) {
                Ok(pairing) => pairing,
                Err(SelectionFailure::Terminal(kind)) => {
                    return Err(DispatchError::new(kind).into());
                }
                Err(SelectionFailure::AllTried) => break,
            };
            tried.insert((pairing.credential.suffix().to_string(), pairing.model.clone()));

            self.throttle.await_turn().await;

            debug!(
                "trying credential {} with model {}",
                pairing.credential, pairing.model
            );
            let request = ChatRequest::user_prompt(&pairing.model, options);

            let exchange = match self.transport.execute(&pairing.credential, &request).await {
                Ok(exchange) => exchange,
                Err(e) => {
                    // Transport never completed; blame neither subject.
                    warn!("attempt failed before reaching the upstream: {}", e.message);
                    last_error = Some(DispatchErrorKind::Network(e.message));
                    continue;
                }
            };

            match classify_exchange(&exchange) {
                Outcome::Success(text) => {
                    debug!(
                        "success with credential {} and model {}",
                        pairing.credential, pairing.model
                    );
                    return Ok(text);
                }
                Outcome::Empty => {
                    warn!("empty reply from model {}", pairing.model);
                    last_error = Some(DispatchErrorKind::EmptyResponse);
                }
                Outcome::RateLimited {
                    retry_after,
                    exhausts_credential,
                    message,
                } => {
                    let block = retry_after.unwrap_or(self.tuning.default_retry_after);
                    if exhausts_credential {
                        self.tracker
                            .mark_blocked(Subject::credential(&pairing.credential), block);
                    }
                    // A 429 is assumed model-contended unless proven otherwise.
                    self.tracker
                        .mark_blocked(Subject::model(pairing.model.clone()), block);
                    last_error = Some(DispatchErrorKind::RateLimited { message });
                }
                Outcome::Unauthorized { message } => {
                    warn!(
                        "credential {} rejected by upstream: {}",
                        pairing.credential, message
                    );
                    self.tracker.mark_blocked(
                        Subject::credential(&pairing.credential),
                        self.tuning.invalid_credential_block,
                    );
                    last_error = Some(DispatchErrorKind::InvalidCredential);
                }
                Outcome::Upstream { status, message } => {
                    warn!("upstream error {} from model {}", status, pairing.model);
                    last_error = Some(DispatchErrorKind::Upstream { status, message });
                }
            }
        }

        Err(DispatchError::new(DispatchErrorKind::AttemptsExhausted {
            last: last_error.map(Box::new),
        })
        .into())
    }

    /// Produce the next untried pairing, or report why none exists.
    ///
    /// Credentials are scanned in rotating order, models in preference
    /// order within each credential; the cursor advances only when a
    /// pairing is committed.
    fn next_pairing(&self, tried: &HashSet<(String, String)>) -> Result<Pairing, SelectionFailure> {
        let credentials = self.credentials.eligible(&self.tracker);
        let models = self.models.eligible(&self.tracker);

        if credentials.is_empty() || models.is_empty() {
            return Err(SelectionFailure::Terminal(self.exhaustion_kind(
                credentials.is_empty(),
                models.is_empty(),
            )));
        }

        for (index, credential) in &credentials {
            for model in &models {
                let key = (credential.suffix().to_string(), model.clone());
                if !tried.contains(&key) {
                    self.credentials.advance_past(*index);
                    return Ok(Pairing {
                        credential: credential.clone(),
                        model: model.clone(),
                    });
                }
            }
        }

        Err(SelectionFailure::AllTried)
    }

    /// Terminal error for a fully rate-limited pool, with a wait estimate.
    fn exhaustion_kind(&self, credentials_empty: bool, models_empty: bool) -> DispatchErrorKind {
        let wait_over = |subjects: Vec<Subject>| {
            self.tracker
                .next_unblock_wait(subjects)
                .map(secs_ceil)
                .unwrap_or(0)
                .max(1)
        };

        if credentials_empty && models_empty {
            let mut subjects = self.credentials.subjects();
            subjects.extend(self.models.subjects());
            DispatchErrorKind::ResourcesExhausted {
                wait_secs: wait_over(subjects),
            }
        } else if credentials_empty {
            DispatchErrorKind::CredentialsExhausted {
                wait_secs: wait_over(self.credentials.subjects()),
            }
        } else {
            DispatchErrorKind::ModelsExhausted {
                wait_secs: wait_over(self.models.subjects()),
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("credentials", &self.credentials.len())
            .field("models", &self.models.len())
            .field("tuning", &self.tuning)
            .finish()
    }
}
