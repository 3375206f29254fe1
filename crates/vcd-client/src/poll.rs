//! Poll scheduling for long-running tasks.
//!
//! There is no HTTP retry layer. The only loop in the client is task
//! polling, and its delays are computed here.

use rand::Rng;
use std::time::Duration;

/// Delay schedule used while waiting on a task.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the second poll.
    pub interval: Duration,
    /// Upper bound for any single delay.
    pub max_interval: Duration,
    /// How the delay grows between polls.
    pub backoff: BackoffStrategy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_interval: Duration::from_secs(30),
            backoff: BackoffStrategy::Constant,
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_interval(mut self, max: Duration) -> Self {
        self.max_interval = max;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Poll quickly at first, then back off. Suited to tasks that usually
    /// finish within a few seconds.
    pub fn eager() -> Self {
        Self {
            interval: Duration::from_millis(250),
            max_interval: Duration::from_secs(10),
            backoff: BackoffStrategy::ExponentialWithJitter { factor: 2.0 },
        }
    }

    /// Delay to wait after the given poll (0-indexed).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .delay(attempt, self.interval, self.max_interval)
    }
}

/// Backoff strategy for determining poll delays.
#[derive(Debug, Clone, Copy)]
pub enum BackoffStrategy {
    /// Constant delay between polls.
    Constant,
    /// Linear increase in delay (delay * attempt).
    Linear,
    /// Exponential increase in delay (delay * factor^attempt).
    Exponential { factor: f64 },
    /// Exponential with random jitter so concurrent waiters spread out.
    ExponentialWithJitter { factor: f64 },
}

impl BackoffStrategy {
    /// Calculate the delay for a given attempt number (0-indexed).
    ///
    /// Exponential factors below 1.0 (including negative and NaN values)
    /// are treated as 1.0, so the delay never shrinks below `initial_delay`.
    pub fn delay(&self, attempt: u32, initial_delay: Duration, max_delay: Duration) -> Duration {
        let delay = match self {
            BackoffStrategy::Constant => initial_delay,
            BackoffStrategy::Linear => initial_delay.saturating_mul(attempt.saturating_add(1)),
            BackoffStrategy::Exponential { factor } => {
                let base = exponential_secs(*factor, attempt, initial_delay, max_delay);
                Duration::try_from_secs_f64(base).unwrap_or(max_delay)
            }
            BackoffStrategy::ExponentialWithJitter { factor } => {
                let base = exponential_secs(*factor, attempt, initial_delay, max_delay);

                // jitter in [0, base)
                let jitter = rand::rng().random::<f64>() * base;

                Duration::try_from_secs_f64(base + jitter).unwrap_or(max_delay)
            }
        };

        std::cmp::min(delay, max_delay)
    }
}

fn exponential_secs(factor: f64, attempt: u32, initial_delay: Duration, max_delay: Duration) -> f64 {
    let factor = factor.max(1.0);
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    (initial_delay.as_secs_f64() * factor.powi(exponent)).min(max_delay.as_secs_f64())
}
