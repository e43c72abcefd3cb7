//! Credential and model pools with rate-limit-aware selection.
//!
//! The two pools deliberately select differently. Credentials are fungible
//! identities, so selection rotates through the pool to spread load and
//! remembers where it left off. Models are ranked by quality, so selection
//! always scans from the most preferred and degrades only while better
//! entries are blocked.

use paisa_core::Credential;
use paisa_rate_limit::{RateLimitTracker, Subject};
use std::sync::Mutex;
use tracing::debug;

/// Ordered pool of interchangeable API credentials.
///
/// # Example
///
/// ```
/// use paisa_core::Credential;
/// use paisa_models::CredentialPool;
/// use paisa_rate_limit::RateLimitTracker;
///
/// let pool = CredentialPool::new(vec![
///     Credential::new("key-one"),
///     Credential::new("key-two"),
/// ]);
/// let tracker = RateLimitTracker::new();
///
/// // Healthy pool: consecutive selections rotate
/// assert_eq!(pool.select(&tracker).unwrap().expose(), "key-one");
/// assert_eq!(pool.select(&tracker).unwrap().expose(), "key-two");
/// assert_eq!(pool.select(&tracker).unwrap().expose(), "key-one");
/// ```
#[derive(Debug)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
    cursor: Mutex<usize>,
}

impl CredentialPool {
    /// Create a pool from an ordered credential list.
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials,
            cursor: Mutex::new(0),
        }
    }

    /// Number of credentials in the pool.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether the pool holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Rate-limit subjects for every credential in the pool.
    pub fn subjects(&self) -> Vec<Subject> {
        self.credentials.iter().map(Subject::credential).collect()
    }

    /// Non-blocked credentials in rotating scan order.
    ///
    /// The scan starts at the remembered cursor and wraps; each entry
    /// carries its pool index so the caller can advance the cursor once a
    /// pairing is committed.
    pub(crate) fn eligible(&self, tracker: &RateLimitTracker) -> Vec<(usize, Credential)> {
        let start = *self.cursor.lock().expect("credential cursor lock poisoned");
        let len = self.credentials.len();

        (0..len)
            .map(|offset| (start + offset) % len)
            .filter_map(|index| {
                let credential = &self.credentials[index];
                if tracker.is_blocked(&Subject::credential(credential)) {
                    None
                } else {
                    Some((index, credential.clone()))
                }
            })
            .collect()
    }

    /// Advance the cursor past the given pool index.
    ///
    /// Called when a selection is committed, so the next logical request
    /// starts its scan at the following credential.
    pub(crate) fn advance_past(&self, index: usize) {
        if self.credentials.is_empty() {
            return;
        }
        let mut cursor = self.cursor.lock().expect("credential cursor lock poisoned");
        *cursor = (index + 1) % self.credentials.len();
    }

    /// Select the next eligible credential and rotate past it.
    ///
    /// Returns `None` when every credential is blocked; the caller decides
    /// how to fail.
    pub fn select(&self, tracker: &RateLimitTracker) -> Option<Credential> {
        let (index, credential) = self.eligible(tracker).into_iter().next()?;
        self.advance_past(index);
        debug!("selected credential {}", credential);
        Some(credential)
    }
}

/// Pool of model identifiers in fixed preference order.
///
/// # Example
///
/// ```
/// use paisa_models::ModelPool;
/// use paisa_rate_limit::{RateLimitTracker, Subject};
/// use std::time::Duration;
///
/// let pool = ModelPool::new(vec!["best".to_string(), "backup".to_string()]);
/// let tracker = RateLimitTracker::new();
///
/// assert_eq!(pool.select(&tracker).as_deref(), Some("best"));
///
/// tracker.mark_blocked(Subject::model("best"), Duration::from_secs(60));
/// assert_eq!(pool.select(&tracker).as_deref(), Some("backup"));
/// ```
#[derive(Debug)]
pub struct ModelPool {
    models: Vec<String>,
}

impl ModelPool {
    /// Create a pool from a preference-ordered model list.
    pub fn new(models: Vec<String>) -> Self {
        Self { models }
    }

    /// Number of models in the pool.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the pool holds no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Rate-limit subjects for every model in the pool.
    pub fn subjects(&self) -> Vec<Subject> {
        self.models
            .iter()
            .map(|model| Subject::model(model.clone()))
            .collect()
    }

    /// Non-blocked models in preference order.
    pub(crate) fn eligible(&self, tracker: &RateLimitTracker) -> Vec<String> {
        self.models
            .iter()
            .filter(|model| !tracker.is_blocked(&Subject::model(model.as_str())))
            .cloned()
            .collect()
    }

    /// Select the most preferred model that is not blocked.
    ///
    /// Returns `None` when every model is blocked.
    pub fn select(&self, tracker: &RateLimitTracker) -> Option<String> {
        self.eligible(tracker).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn three_credentials() -> CredentialPool {
        CredentialPool::new(vec![
            Credential::new("credential-a"),
            Credential::new("credential-b"),
            Credential::new("credential-c"),
        ])
    }

    #[test]
    fn healthy_pool_rotates_round_robin() {
        let pool = three_credentials();
        let tracker = RateLimitTracker::new();

        let first = pool.select(&tracker).unwrap();
        let second = pool.select(&tracker).unwrap();
        let third = pool.select(&tracker).unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);

        // Fourth selection wraps back to the first credential
        assert_eq!(pool.select(&tracker).unwrap(), first);
    }

    #[test]
    fn blocked_credentials_are_skipped() {
        let pool = three_credentials();
        let tracker = RateLimitTracker::new();

        tracker.mark_blocked(
            Subject::Credential(Credential::new("credential-a")),
            Duration::from_secs(60),
        );

        assert_eq!(pool.select(&tracker).unwrap().expose(), "credential-b");
    }

    #[test]
    fn fully_blocked_credential_pool_selects_none() {
        let pool = three_credentials();
        let tracker = RateLimitTracker::new();
        for subject in pool.subjects() {
            tracker.mark_blocked(subject, Duration::from_secs(60));
        }
        assert!(pool.select(&tracker).is_none());
    }

    #[test]
    fn model_selection_prefers_index_zero_and_recovers() {
        let pool = ModelPool::new(vec!["best".to_string(), "backup".to_string()]);
        let tracker = RateLimitTracker::new();

        // Always the most preferred while healthy
        assert_eq!(pool.select(&tracker).as_deref(), Some("best"));
        assert_eq!(pool.select(&tracker).as_deref(), Some("best"));

        // Degrades while blocked
        tracker.mark_blocked(Subject::model("best"), Duration::from_millis(50));
        assert_eq!(pool.select(&tracker).as_deref(), Some("backup"));

        // Reverts as soon as the block expires
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(pool.select(&tracker).as_deref(), Some("best"));
    }

    #[test]
    fn fully_blocked_model_pool_selects_none() {
        let pool = ModelPool::new(vec!["only".to_string()]);
        let tracker = RateLimitTracker::new();
        tracker.mark_blocked(Subject::model("only"), Duration::from_secs(60));
        assert!(pool.select(&tracker).is_none());
    }
}
