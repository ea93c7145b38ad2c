use std::error::Error as StdError;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

/// Decides what happens after the `attempt`-th consecutive failure (1-based).
pub trait RetryStrategy: Send + Sync {
    fn decide(&self, attempt: u32, last_error: &(dyn StdError + 'static)) -> RetryDecision;
}

/// Waits the same delay after every failure. Without a maximum it never gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<u32>,
}

impl FixedDelay {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    pub fn forever(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    pub fn bounded(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: Some(max_attempts),
        }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::forever(Self::DEFAULT_DELAY)
    }
}

impl RetryStrategy for FixedDelay {
    fn decide(&self, attempt: u32, _last_error: &(dyn StdError + 'static)) -> RetryDecision {
        match self.max_attempts {
            Some(max) if attempt >= max => RetryDecision::GiveUp,
            _ => RetryDecision::RetryAfter(self.delay),
        }
    }
}
