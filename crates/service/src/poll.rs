//! Bounded exponential-backoff polling.
//!
//! Used after a write when the caller needs to observe the new state
//! through a fresh read (for example a different replica serving the
//! event). Each attempt waits longer than the previous one, up to
//! [`PollConfig::max_delay`], and polling stops after
//! [`PollConfig::max_attempts`] reads.

use std::time::Duration;

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the second read.
    pub initial_delay: Duration,
    /// Upper bound on the delay between reads.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each miss.
    pub multiplier: f64,
    /// Total number of reads, including the first.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            multiplier: 2.0,
            max_attempts: 6,
        }
    }
}

/// Delay before the next read: `current` grown by the multiplier, never
/// below [`PollConfig::initial_delay`] and never above
/// [`PollConfig::max_delay`].
pub fn next_delay(current: Duration, config: &PollConfig) -> Duration {
    let grown = current.as_millis() as f64 * config.multiplier.max(1.0);
    Duration::from_millis(grown as u64)
        .max(config.initial_delay)
        .min(config.max_delay)
}
