//! Reconnect backoff policy.
//!
//! Capped exponential backoff with no jitter: a single kiosk talks to a
//! single server, so there is no herd to spread out.

use std::time::Duration;

/// Default first reconnect delay.
pub const DEFAULT_BASE: Duration = Duration::from_millis(250);
/// Default upper bound on any reconnect delay.
pub const DEFAULT_CAP: Duration = Duration::from_millis(5000);
/// Default highest exponent the attempt counter can reach.
pub const DEFAULT_MAX_EXPONENT: u32 = 5;

/// Parameters of the reconnect schedule.
///
/// The delay after a failure is `min(cap, base * 2^attempt)`, where `attempt`
/// counts consecutive failures since the last successful open and stops
/// growing at `max_exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay after the first failure.
    pub base: Duration,
    /// Upper bound on every delay.
    pub cap: Duration,
    /// Highest value of the attempt counter.
    pub max_exponent: u32,
}

impl BackoffPolicy {
    /// Create a policy from explicit parameters.
    pub fn new(base: Duration, cap: Duration, max_exponent: u32) -> Self {
        Self {
            base,
            cap,
            max_exponent,
        }
    }

    /// Delay to wait after a failure observed at `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base.saturating_mul(factor).min(self.cap)
    }

    /// Attempt counter to use after a failure observed at `attempt`.
    pub fn next_attempt(&self, attempt: u32) -> u32 {
        attempt.saturating_add(1).min(self.max_exponent)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_CAP, DEFAULT_MAX_EXPONENT)
    }
}
