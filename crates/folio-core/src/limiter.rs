//! Per-address attempt limiting for code requests.
//!
//! A fixed window opens on the first attempt. Up to `max_attempts` requests
//! are admitted inside it; later ones are refused until the window has fully
//! elapsed, at which point the counter restarts.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Outcome of an [`AttemptLimiter::check`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Admitted; carries the attempt count inside the current window.
    Allowed(u32),
    /// Refused; the window is still open and the budget is spent.
    Limited,
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct Attempts {
    count: u32,
    first_attempt: Instant,
}

pub struct AttemptLimiter {
    attempts: DashMap<String, Attempts>,
    max_attempts: u32,
    window: Duration,
}

impl AttemptLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            attempts: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// Records an attempt for `key` at `now` and reports whether it is admitted.
    pub fn check(&self, key: &str, now: Instant) -> RateDecision {
        match self.attempts.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(Attempts {
                    count: 1,
                    first_attempt: now,
                });
                RateDecision::Allowed(1)
            }
            Entry::Occupied(mut slot) => {
                let attempts = slot.get_mut();
                if now.saturating_duration_since(attempts.first_attempt) > self.window {
                    *attempts = Attempts {
                        count: 1,
                        first_attempt: now,
                    };
                    RateDecision::Allowed(1)
                } else if attempts.count >= self.max_attempts {
                    tracing::debug!("Attempt budget exhausted: key={key}, count={}", attempts.count);
                    RateDecision::Limited
                } else {
                    attempts.count += 1;
                    RateDecision::Allowed(attempts.count)
                }
            }
        }
    }

    /// Drops counters whose window has elapsed.
    pub fn cleanup_expired(&self, now: Instant) {
        let window = self.window;
        self.attempts
            .retain(|_, a| now.saturating_duration_since(a.first_attempt) <= window);
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn first_three_attempts_are_allowed() {
        let limiter = AttemptLimiter::new(3, HOUR);
        let now = Instant::now();

        assert_eq!(limiter.check("a@x.com", now), RateDecision::Allowed(1));
        assert_eq!(limiter.check("a@x.com", now), RateDecision::Allowed(2));
        assert_eq!(limiter.check("a@x.com", now), RateDecision::Allowed(3));
    }

    #[test]
    fn fourth_attempt_in_window_is_limited() {
        let limiter = AttemptLimiter::new(3, HOUR);
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.check("a@x.com", now).is_allowed());
        }

        let later = now + Duration::from_secs(59 * 60);
        assert_eq!(limiter.check("a@x.com", later), RateDecision::Limited);
        assert_eq!(limiter.check("a@x.com", later), RateDecision::Limited);
    }

    #[test]
    fn window_end_is_inclusive() {
        let limiter = AttemptLimiter::new(1, HOUR);
        let now = Instant::now();
        assert!(limiter.check("a@x.com", now).is_allowed());
        assert_eq!(limiter.check("a@x.com", now + HOUR), RateDecision::Limited);
    }

    #[test]
    fn counter_resets_after_window() {
        let limiter = AttemptLimiter::new(3, HOUR);
        let now = Instant::now();
        for _ in 0..3 {
            limiter.check("a@x.com", now);
        }
        assert_eq!(limiter.check("a@x.com", now), RateDecision::Limited);

        let later = now + HOUR + Duration::from_secs(1);
        assert_eq!(limiter.check("a@x.com", later), RateDecision::Allowed(1));
        assert_eq!(limiter.check("a@x.com", later), RateDecision::Allowed(2));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = AttemptLimiter::new(1, HOUR);
        let now = Instant::now();
        assert!(limiter.check("a@x.com", now).is_allowed());
        assert!(limiter.check("b@x.com", now).is_allowed());
        assert!(!limiter.check("a@x.com", now).is_allowed());
    }

    #[test]
    fn cleanup_drops_stale_counters() {
        let limiter = AttemptLimiter::new(3, HOUR);
        let now = Instant::now();
        limiter.check("old@x.com", now);
        limiter.check("new@x.com", now + Duration::from_secs(1800));

        limiter.cleanup_expired(now + HOUR + Duration::from_secs(1));

        assert_eq!(limiter.len(), 1);
        assert!(limiter.check("new@x.com", now + HOUR).is_allowed());
    }
}
