//! Bounded exponential backoff between connection attempts.

use std::time::Duration;

/// When and how often to reconnect after the connection ends.
///
/// Attempts are counted per outage: the caller resets the counter only
/// after a session delivered at least one message, so a server that
/// accepts and immediately closes still runs the budget down. A policy with zero attempts never
/// reconnects, which leaves the log view static after the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl ReconnectPolicy {
    /// Never reconnect.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            max_attempts: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Up to `max_attempts` retries per outage, doubling from `base_delay`
    /// and never waiting longer than `max_delay`.
    #[must_use]
    pub fn bounded(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    /// Whether any retry will ever happen.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.max_attempts > 0
    }

    /// Retries allowed per outage.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `attempt` (1-based), or `None` once the
    /// budget is spent.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        Some(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_never_retries() {
        let policy = ReconnectPolicy::disabled();
        assert!(!policy.is_enabled());
        assert_eq!(policy.delay_for(1), None);
    }

    #[test]
    fn doubles_then_caps() {
        let policy =
            ReconnectPolicy::bounded(6, Duration::from_millis(500), Duration::from_secs(4));
        let delays: Vec<_> = (1..=6).filter_map(|n| policy.delay_for(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(4),
                Duration::from_secs(4),
            ]
        );
    }

    #[test]
    fn budget_is_bounded() {
        let policy = ReconnectPolicy::bounded(2, Duration::from_millis(10), Duration::from_secs(1));
        assert!(policy.delay_for(2).is_some());
        assert_eq!(policy.delay_for(3), None);
    }

    #[test]
    fn largest_budget_still_yields_a_delay() {
        let policy =
            ReconnectPolicy::bounded(u32::MAX, Duration::from_millis(5), Duration::from_secs(1));
        assert_eq!(policy.delay_for(u32::MAX), Some(Duration::from_secs(1)));
    }

    #[test]
    fn huge_attempt_numbers_saturate() {
        let policy =
            ReconnectPolicy::bounded(u32::MAX, Duration::from_secs(1), Duration::from_secs(60));
        assert_eq!(policy.delay_for(200), Some(Duration::from_secs(60)));
    }
}
