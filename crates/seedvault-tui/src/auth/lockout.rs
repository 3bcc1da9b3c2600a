//! Brute-force protection through progressive lockout
//!
//! Failed unlocks are counted for the lifetime of the process. Argon2id
//! already makes each guess expensive; the lockout adds a growing delay on
//! top of that.

use std::time::{Duration, Instant};

/// Lockout policy for failed PIN attempts
#[derive(Clone, Debug)]
pub struct LockoutPolicy {
    /// Thresholds and their corresponding lockout durations
    /// Format: (min_attempts, lockout_duration)
    thresholds: Vec<(u32, Duration)>,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            thresholds: vec![
                // Attempts 1-2: No lockout
                (3, Duration::from_secs(30)),
                (5, Duration::from_secs(5 * 60)),
                (8, Duration::from_secs(30 * 60)),
            ],
        }
    }
}

impl LockoutPolicy {
    /// Create a custom lockout policy
    pub fn custom(thresholds: Vec<(u32, Duration)>) -> Self {
        Self { thresholds }
    }

    /// Get the lockout duration for a given number of failed attempts
    pub fn lockout_duration(&self, failed_attempts: u32) -> Option<Duration> {
        // Find the highest threshold that applies
        self.thresholds
            .iter()
            .rev()
            .find(|(min, _)| failed_attempts >= *min)
            .map(|(_, duration)| *duration)
    }

    /// Get the number of attempts allowed before the first lockout
    pub fn max_attempts(&self) -> u32 {
        self.thresholds
            .first()
            .map(|(min, _)| *min)
            .unwrap_or(3)
    }
}

/// Failed attempt counter with lockout deadline
#[derive(Clone, Debug, Default)]
pub struct PinAttempts {
    policy: LockoutPolicy,
    failed: u32,
    locked_until: Option<Instant>,
}

impl PinAttempts {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            failed: 0,
            locked_until: None,
        }
    }

    /// Record a wrong PIN, possibly starting a lockout
    pub fn record_failure(&mut self) {
        self.failed += 1;
        if let Some(duration) = self.policy.lockout_duration(self.failed) {
            self.locked_until = Some(Instant::now() + duration);
        }
    }

    /// Record a successful unlock
    pub fn record_success(&mut self) {
        self.failed = 0;
        self.locked_until = None;
    }

    /// Seconds left in the current lockout, if any
    pub fn lockout_remaining(&self) -> Option<u64> {
        self.locked_until
            .filter(|until| Instant::now() < *until)
            .map(|until| until.duration_since(Instant::now()).as_secs().max(1))
    }

    pub fn is_locked_out(&self) -> bool {
        self.lockout_remaining().is_some()
    }

    /// Attempts left before the next lockout kicks in
    pub fn attempts_remaining(&self) -> u32 {
        self.policy.max_attempts().saturating_sub(self.failed)
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = LockoutPolicy::default();

        assert!(policy.lockout_duration(1).is_none());
        assert!(policy.lockout_duration(2).is_none());

        assert_eq!(policy.lockout_duration(3), Some(Duration::from_secs(30)));
        assert_eq!(policy.lockout_duration(4), Some(Duration::from_secs(30)));
        assert_eq!(policy.lockout_duration(5), Some(Duration::from_secs(300)));
        assert_eq!(policy.lockout_duration(100), Some(Duration::from_secs(1800)));
        assert_eq!(policy.max_attempts(), 3);
    }

    #[test]
    fn test_attempts_lock_out_after_threshold() {
        let mut attempts = PinAttempts::default();

        attempts.record_failure();
        attempts.record_failure();
        assert!(!attempts.is_locked_out());
        assert_eq!(attempts.attempts_remaining(), 1);

        attempts.record_failure();
        assert!(attempts.is_locked_out());
        let remaining = attempts.lockout_remaining().unwrap();
        assert!(remaining > 0 && remaining <= 30);
    }

    #[test]
    fn test_success_clears_lockout() {
        let policy = LockoutPolicy::custom(vec![(1, Duration::from_secs(60))]);
        let mut attempts = PinAttempts::new(policy);

        attempts.record_failure();
        assert!(attempts.is_locked_out());

        attempts.record_success();
        assert!(!attempts.is_locked_out());
        assert_eq!(attempts.failed(), 0);
    }

    #[test]
    fn test_expired_lockout() {
        let mut attempts = PinAttempts::new(LockoutPolicy::custom(vec![(1, Duration::ZERO)]));
        attempts.record_failure();
        assert!(!attempts.is_locked_out());
    }
}
