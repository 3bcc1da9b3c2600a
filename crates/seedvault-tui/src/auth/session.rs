//! Idle tracking for auto-lock

use std::time::{Duration, Instant};

/// Warning period before the idle lock fires
const WARNING_PERIOD: Duration = Duration::from_secs(15);

/// Tracks time since the last key press
#[derive(Clone, Debug)]
pub struct IdleTimer {
    /// Last activity timestamp
    last_activity: Instant,
    /// Idle timeout duration
    timeout: Duration,
}

impl IdleTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            last_activity: Instant::now(),
            timeout,
        }
    }

    /// Record activity (resets timeout)
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Check if the idle timeout has passed
    pub fn is_expired(&self) -> bool {
        self.last_activity.elapsed() > self.timeout
    }

    /// Check if we're in the warning period
    pub fn is_warning_period(&self) -> bool {
        let elapsed = self.last_activity.elapsed();
        !self.is_expired() && elapsed > self.timeout.saturating_sub(WARNING_PERIOD)
    }

    /// Get remaining time until expiry in seconds
    pub fn remaining_seconds(&self) -> u64 {
        self.timeout
            .saturating_sub(self.last_activity.elapsed())
            .as_secs()
    }

    /// Format remaining time as MM:SS
    pub fn remaining_formatted(&self) -> String {
        let secs = self.remaining_seconds();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
