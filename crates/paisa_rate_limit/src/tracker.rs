//! Rate-limit state shared across logical requests.

use paisa_core::Credential;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Round a duration up to whole seconds.
///
/// Wait estimates reported to callers always round up so "retry in N
/// seconds" is never early.
pub fn secs_ceil(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 { secs + 1 } else { secs }
}

/// A subject that can be rate limited: one credential or one model.
///
/// Typed keys keep credential blocks and model blocks in one map without
/// any chance of a model name colliding with a credential value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// An API credential, keyed by its full value
    Credential(Credential),
    /// A model identifier
    Model(String),
}

impl Subject {
    /// Key for a credential.
    pub fn credential(credential: &Credential) -> Self {
        Subject::Credential(credential.clone())
    }

    /// Key for a model identifier.
    pub fn model(model: impl Into<String>) -> Self {
        Subject::Model(model.into())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Credential(credential) => write!(f, "credential {}", credential),
            Subject::Model(model) => write!(f, "model {}", model),
        }
    }
}

/// Tracks which subjects are rate limited and until when.
///
/// Entries expire lazily: a read past the unblock instant treats the
/// subject as eligible and removes the entry, so no sweeper task is
/// needed. One entry per subject, last write wins.
///
/// The tracker is shared by every logical request in the process; this is
/// deliberate, so a 429 observed by one request steers all the others away
/// from the same credential or model.
///
/// # Example
///
/// ```
/// use paisa_rate_limit::{RateLimitTracker, Subject};
/// use std::time::Duration;
///
/// let tracker = RateLimitTracker::new();
/// let subject = Subject::model("some/model");
///
/// tracker.mark_blocked(subject.clone(), Duration::from_secs(60));
/// assert!(tracker.is_blocked(&subject));
/// ```
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    blocked: Mutex<HashMap<Subject, Instant>>,
}

impl RateLimitTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block a subject for the given duration from now.
    ///
    /// Overwrites any existing entry for the subject.
    pub fn mark_blocked(&self, subject: Subject, for_duration: Duration) {
        let until = Instant::now() + for_duration;
        warn!(
            "{} rate limited for {} second(s)",
            subject,
            secs_ceil(for_duration)
        );
        self.blocked
            .lock()
            .expect("rate limit tracker lock poisoned")
            .insert(subject, until);
    }

    /// Whether the subject is currently blocked.
    ///
    /// An entry whose unblock instant has passed counts as absent and is
    /// removed on the spot.
    pub fn is_blocked(&self, subject: &Subject) -> bool {
        let now = Instant::now();
        let mut blocked = self
            .blocked
            .lock()
            .expect("rate limit tracker lock poisoned");
        match blocked.get(subject) {
            Some(until) if *until > now => true,
            Some(_) => {
                blocked.remove(subject);
                debug!("{} block expired", subject);
                false
            }
            None => false,
        }
    }

    /// Remaining wait for one subject, `None` when it is not blocked.
    pub fn remaining_wait(&self, subject: &Subject) -> Option<Duration> {
        let now = Instant::now();
        let blocked = self
            .blocked
            .lock()
            .expect("rate limit tracker lock poisoned");
        blocked
            .get(subject)
            .and_then(|until| until.checked_duration_since(now))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Shortest remaining wait across the given subjects.
    ///
    /// Returns `None` when none of them are blocked. Used to tell callers
    /// how long until a retry could succeed.
    pub fn next_unblock_wait(&self, subjects: impl IntoIterator<Item = Subject>) -> Option<Duration> {
        subjects
            .into_iter()
            .filter_map(|subject| self.remaining_wait(&subject))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_subject_is_not_blocked() {
        let tracker = RateLimitTracker::new();
        assert!(!tracker.is_blocked(&Subject::model("free/model")));
    }

    #[test]
    fn blocked_subject_reports_blocked_until_expiry() {
        let tracker = RateLimitTracker::new();
        let subject = Subject::model("free/model");

        tracker.mark_blocked(subject.clone(), Duration::from_millis(50));
        assert!(tracker.is_blocked(&subject));

        std::thread::sleep(Duration::from_millis(60));
        assert!(!tracker.is_blocked(&subject));
        // Expired entry was pruned on read
        assert!(tracker.remaining_wait(&subject).is_none());
    }

    #[test]
    fn last_write_wins() {
        let tracker = RateLimitTracker::new();
        let subject = Subject::model("free/model");

        tracker.mark_blocked(subject.clone(), Duration::from_secs(600));
        tracker.mark_blocked(subject.clone(), Duration::from_millis(30));

        std::thread::sleep(Duration::from_millis(40));
        assert!(!tracker.is_blocked(&subject));
    }

    #[test]
    fn subjects_are_independent() {
        let tracker = RateLimitTracker::new();
        let credential = paisa_core::Credential::new("sk-or-v1-abcdef");
        let model = Subject::model("free/model");

        tracker.mark_blocked(Subject::credential(&credential), Duration::from_secs(60));
        assert!(tracker.is_blocked(&Subject::credential(&credential)));
        assert!(!tracker.is_blocked(&model));
    }

    #[test]
    fn next_unblock_wait_returns_minimum() {
        let tracker = RateLimitTracker::new();
        let near = Subject::model("near");
        let far = Subject::model("far");

        tracker.mark_blocked(near.clone(), Duration::from_secs(2));
        tracker.mark_blocked(far.clone(), Duration::from_secs(120));

        let wait = tracker
            .next_unblock_wait([near, far, Subject::model("unblocked")])
            .expect("two subjects are blocked");
        assert!(wait <= Duration::from_secs(2));
        assert!(wait > Duration::from_millis(1900));
    }

    #[test]
    fn next_unblock_wait_none_when_all_clear() {
        let tracker = RateLimitTracker::new();
        assert!(
            tracker
                .next_unblock_wait([Subject::model("a"), Subject::model("b")])
                .is_none()
        );
    }

    #[test]
    fn secs_ceil_rounds_up() {
        assert_eq!(secs_ceil(Duration::from_secs(2)), 2);
        assert_eq!(secs_ceil(Duration::from_millis(1900)), 2);
        assert_eq!(secs_ceil(Duration::from_millis(1)), 1);
        assert_eq!(secs_ceil(Duration::ZERO), 0);
    }
}
