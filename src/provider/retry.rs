//! Bounded retry with backoff around a provider.
//!
//! Only [`ProviderError::Transient`] failures are retried. When attempts
//! run out, the last error is returned and the orchestrator treats it as
//! "no action".

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{DecisionProvider, DecisionRequest, ProviderError, SpeechRequest};

/// Backoff configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackoffConfig {
    /// Fixed delay between attempts.
    Fixed { delay: Duration },

    /// Exponential backoff.
    Exponential {
        initial_delay: Duration,
        max_delay: Duration,
        /// Multiplier for each retry (default: 2.0).
        #[serde(default = "default_multiplier")]
        multiplier: f64,
    },
}

const fn default_multiplier() -> f64 {
    2.0
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self::Exponential {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl BackoffConfig {
    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => *delay,
            Self::Exponential {
                initial_delay,
                max_delay,
                multiplier,
            } => {
                let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
                let nanos = initial_delay.as_nanos() as f64 * multiplier.powi(exponent);
                if !nanos.is_finite() || nanos >= max_delay.as_nanos() as f64 {
                    *max_delay
                } else {
                    Duration::from_nanos(nanos.round() as u64)
                }
            }
        }
    }
}

/// How many times to try and how long to wait between tries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first (at least 1).
    pub max_attempts: u32,
    pub backoff: BackoffConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffConfig::default(),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }
}

/// Run `op`, retrying transient failures per `policy`.
///
/// `sleep` is called with each backoff delay.
pub fn call_with_retry<T, F>(
    policy: &RetryPolicy,
    sleep: &mut dyn FnMut(Duration),
    mut op: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Result<T, ProviderError>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                let delay = policy.backoff.delay_for_attempt(attempt);
                warn!(attempt, ?delay, error = %err, "provider call failed, retrying");
                sleep(delay);
                attempt += 1;
            }
            Err(err) => {
                debug!(attempt, error = %err, "provider call gave up");
                return Err(err);
            }
        }
    }
}

/// Wraps a provider with [`call_with_retry`].
pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
    sleep: Box<dyn FnMut(Duration) + Send>,
}

impl<P: DecisionProvider> RetryingProvider<P> {
    /// Wrap `inner`, sleeping the current thread between attempts.
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the sleep function (tests, simulated clocks).
    #[must_use]
    pub fn with_sleeper(mut self, sleep: impl FnMut(Duration) + Send + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: DecisionProvider> DecisionProvider for RetryingProvider<P> {
    fn choose(&mut self, request: &DecisionRequest<'_>) -> Result<Option<String>, ProviderError> {
        let inner = &mut self.inner;
        call_with_retry(&self.policy, &mut *self.sleep, || inner.choose(request))
    }

    fn choose_shoot_target(
        &mut self,
        request: &DecisionRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        let inner = &mut self.inner;
        call_with_retry(&self.policy, &mut *self.sleep, || {
            inner.choose_shoot_target(request)
        })
    }

    fn speak(&mut self, request: &SpeechRequest<'_>) -> Result<Option<String>, ProviderError> {
        let inner = &mut self.inner;
        call_with_retry(&self.policy, &mut *self.sleep, || inner.speak(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::TransientKind;
    use std::sync::{Arc, Mutex};

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new().with_max_attempts(attempts).with_backoff(BackoffConfig::Exponential {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(35),
            multiplier: 2.0,
        })
    }

    #[test]
    fn test_exponential_backoff() {
        let backoff = BackoffConfig::default();
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(backoff.delay_for_attempt(10), Duration::from_secs(30));
        assert_eq!(backoff.delay_for_attempt(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_retries_transient_then_succeeds() {
        let mut delays = Vec::new();
        let mut calls = 0;
        let result = call_with_retry(&fast_policy(4), &mut |d| delays.push(d), || {
            calls += 1;
            if calls < 3 {
                Err(ProviderError::transient(TransientKind::Timeout, "slow"))
            } else {
                Ok(calls)
            }
        });

        assert_eq!(result, Ok(3));
        assert_eq!(delays, vec![Duration::from_millis(10), Duration::from_millis(20)]);
    }

    #[test]
    fn test_exhausted_retries_return_last_error() {
        let mut sleeps = 0;
        let mut calls = 0;
        let result: Result<(), _> = call_with_retry(&fast_policy(3), &mut |_| sleeps += 1, || {
            calls += 1;
            Err(ProviderError::transient(TransientKind::ConnectionReset, "reset"))
        });

        assert!(result.unwrap_err().is_transient());
        assert_eq!(calls, 3);
        assert_eq!(sleeps, 2);
    }

    #[test]
    fn test_fatal_is_not_retried() {
        let mut calls = 0;
        let result: Result<(), _> = call_with_retry(&fast_policy(5), &mut |_| {}, || {
            calls += 1;
            Err(ProviderError::fatal("nope"))
        });

        assert_eq!(result, Err(ProviderError::fatal("nope")));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_retrying_provider_uses_sleeper() {
        let slept = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&slept);
        let actor = crate::core::PlayerId::new("A");
        let inner = crate::provider::ScriptedProvider::new()
            .with_failure(
                "A",
                "vote",
                ProviderError::transient(TransientKind::RateLimited, "429"),
            )
            .with_answer("A", "vote", "B");
        let mut provider = RetryingProvider::new(inner, fast_policy(3))
            .with_sleeper(move |d| log.lock().unwrap().push(d));

        let legal = crate::core::PlayerId::roster(["B"]);
        let request = DecisionRequest {
            actor: &actor,
            role: crate::core::Role::Villager,
            kind: &crate::rules::DecisionKind::Vote,
            context: "",
            legal_targets: &legal,
            strategy: &[],
        };

        assert_eq!(provider.choose(&request), Ok(Some("B".to_string())));
        assert_eq!(slept.lock().unwrap().len(), 1);
    }
}
