//! Process-wide request throttle.
//!
//! The upstream free tier tolerates bursts poorly, so every attempt, no
//! matter which credential or model it uses, passes through one gate that
//! enforces a minimum spacing between request starts. The gate is built on
//! the governor crate's GCRA limiter: a quota of one cell per interval
//! serializes rapid callers exactly `min_interval` apart and lets an idle
//! caller through immediately.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::fmt;
use std::time::Duration;
use tracing::debug;

// Type alias for our direct rate limiter
type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Gate enforcing a minimum interval between request starts.
///
/// Shared process-wide: concurrent logical requests contend on the same
/// gate, which is what keeps their combined cadence under the upstream's
/// burst tolerance. Passing through the gate always consumes the slot,
/// whether or not the caller had to wait.
///
/// # Example
///
/// ```no_run
/// use paisa_rate_limit::RequestThrottle;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let throttle = RequestThrottle::new(Duration::from_millis(1500));
///
/// // Before each attempt
/// throttle.await_turn().await;
/// // ... issue the request ...
/// # }
/// ```
pub struct RequestThrottle {
    limiter: Option<DirectRateLimiter>,
    min_interval: Duration,
}

impl RequestThrottle {
    /// Create a throttle with the given minimum spacing.
    ///
    /// A zero interval disables the gate entirely (used by tests that
    /// exercise the dispatcher loop without timing).
    pub fn new(min_interval: Duration) -> Self {
        let limiter = Quota::with_period(min_interval).map(RateLimiter::direct);
        if limiter.is_none() {
            debug!("request throttle disabled (zero interval)");
        }
        Self {
            limiter,
            min_interval,
        }
    }

    /// Wait until at least `min_interval` has passed since the previous
    /// permitted attempt, then consume the slot.
    pub async fn await_turn(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// The configured minimum spacing.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

impl fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("min_interval", &self.min_interval)
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn spaces_consecutive_attempts() {
        let interval = Duration::from_millis(100);
        let throttle = RequestThrottle::new(interval);

        let start = Instant::now();
        throttle.await_turn().await;
        throttle.await_turn().await;
        throttle.await_turn().await;

        // Three grants back-to-back: the second and third each wait a full
        // interval, within scheduler tolerance.
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(190),
            "three grants took only {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn idle_caller_passes_immediately() {
        let throttle = RequestThrottle::new(Duration::from_millis(100));

        throttle.await_turn().await;
        tokio::time::sleep(Duration::from_millis(120)).await;

        let start = Instant::now();
        throttle.await_turn().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_interval_disables_gate() {
        let throttle = RequestThrottle::new(Duration::ZERO);

        let start = Instant::now();
        for _ in 0..5 {
            throttle.await_turn().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
