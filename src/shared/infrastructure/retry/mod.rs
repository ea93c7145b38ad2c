// Conflict retry executor.
//
// Purpose
// - Re-run a unit of work for as long as it fails with a persistence conflict
//   and the strategy keeps answering RetryAfter.
//
// Responsibilities
// - Propagate any other failure immediately, without retrying.
// - Log every failed attempt with its cause and every retry with its attempt number.
//
// Boundaries
// - The unit of work must be idempotent. The executor never inspects what it did.
// - With the default strategy a conflict that never clears stalls the caller forever.

pub mod strategy;

use std::error::Error as StdError;
use std::future::Future;
use thiserror::Error;

pub use strategy::{FixedDelay, RetryDecision, RetryStrategy};

/// Classifies a failure for the retry executor.
pub trait Retryable {
    fn is_persistence_conflict(&self) -> bool;
}

#[derive(Debug, Error)]
pub enum RetryError<E: StdError + 'static> {
    #[error("gave up after {attempts} failed attempts: {last}")]
    GaveUp {
        attempts: u32,
        #[source]
        last: E,
    },

    #[error(transparent)]
    NotRetryable(E),
}

pub struct RetryExecutor<TStrategy>
where
    TStrategy: RetryStrategy,
{
    strategy: TStrategy,
}

impl<TStrategy> RetryExecutor<TStrategy>
where
    TStrategy: RetryStrategy,
{
    pub fn new(strategy: TStrategy) -> Self {
        Self { strategy }
    }

    pub async fn execute<T, E, F, Fut>(&self, mut work: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: StdError + Retryable + 'static,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let error = match work().await {
                Ok(value) => return Ok(value),
                Err(error) if !error.is_persistence_conflict() => {
                    return Err(RetryError::NotRetryable(error));
                }
                Err(error) => error,
            };

            tracing::error!(
                attempt,
                error = %error,
                cause = ?error.source().map(|source| source.to_string()),
                "execution attempt failed"
            );

            match self.strategy.decide(attempt, &error) {
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(attempt, ?delay, "failure #{attempt}, retrying");
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    tracing::error!(attempt, "giving up");
                    return Err(RetryError::GaveUp {
                        attempts: attempt,
                        last: error,
                    });
                }
            }
        }
    }
}
