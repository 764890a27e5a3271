//! Bounded retry for transient API failures.
//!
//! All three tools share one policy: at most three attempts per HTTP call,
//! waiting 5s and then 10s in between (doubling, capped at 60s). Only
//! [`SkillError::TransientFailure`] is retried.

use std::{future::Future, time::Duration};

use log::warn;

use crate::{
    clock::Clock,
    error::{Result, SkillError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Transient,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Succeed,
    Retry { delay: Duration },
    Fail,
}

impl RetryPolicy {
    /// What to do after `attempt` (1-based) ended with `outcome`.
    pub fn decide(&self, attempt: u32, outcome: Outcome) -> Decision {
        match outcome {
            Outcome::Success => Decision::Succeed,
            Outcome::Fatal => Decision::Fail,
            Outcome::Transient if attempt >= self.max_attempts => Decision::Fail,
            Outcome::Transient => Decision::Retry {
                delay: self.delay_after(attempt),
            },
        }
    }

    fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

impl<T> From<&Result<T>> for Outcome {
    fn from(res: &Result<T>) -> Self {
        match res {
            Ok(_) => Outcome::Success,
            Err(e) if e.is_transient() => Outcome::Transient,
            Err(_) => Outcome::Fatal,
        }
    }
}

/// Runs `op` until it succeeds, fails fatally, or the policy gives up. The
/// last error is returned when attempts run out.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    clock: &dyn Clock,
    what: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        let res = op().await;
        match policy.decide(attempt, Outcome::from(&res)) {
            Decision::Succeed | Decision::Fail => return res,
            Decision::Retry { delay } => {
                if let Err(e) = &res {
                    warn!(
                        "{what}: attempt {attempt}/{} failed (retrying in {}s): {e}",
                        policy.max_attempts,
                        delay.as_secs()
                    );
                }
                clock.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
