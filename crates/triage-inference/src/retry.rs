//! Retrying model invoker.
//!
//! One classification = up to `max_attempts` model calls. Every attempt
//! failure is retried the same way: transport errors, per-attempt timeouts,
//! non-2xx responses, unparseable output and (in strict mode) non-canonical
//! labels. Backoff between attempts is a capped exponential from `backon`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use backon::{ExponentialBuilder, Retryable};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use triage_core::{defaults, ClassificationResult, GenerationBackend};

use crate::parser::{parse_classification, LabelError, ParseError};
use crate::prompt::classification_prompt;

/// Attempt count, per-attempt timeout and exponential backoff bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first call included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            base_delay: Duration::from_millis(defaults::RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(defaults::RETRY_MAX_DELAY_MS),
            attempt_timeout: Duration::from_secs(defaults::LLM_TIMEOUT_SECS),
        }
    }
}

impl RetryPolicy {
    /// Sleeps between attempts: `base * 2^(n-1)` after failed attempt `n`,
    /// capped at `max_delay`, one fewer than the attempts.
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.max_delay)
            .with_factor(2.0)
            .with_max_times(self.max_attempts.max(1) as usize - 1)
    }
}

/// Why a single model attempt failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model call failed: {0}")]
    Backend(#[from] triage_core::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Labels(#[from] LabelError),
}

/// The model path gave up.
#[derive(Debug, Error)]
#[error("model unavailable after {attempts} attempt(s): {last_error}")]
pub struct ModelUnavailable {
    pub attempts: u32,
    pub last_error: AttemptError,
}

/// Prompt, call, parse and validate with retries.
#[derive(Clone)]
pub struct ModelInvoker {
    backend: Arc<dyn GenerationBackend>,
    policy: RetryPolicy,
    lenient_labels: bool,
}

impl ModelInvoker {
    pub fn new(backend: Arc<dyn GenerationBackend>, policy: RetryPolicy) -> Self {
        Self {
            backend,
            policy,
            lenient_labels: false,
        }
    }

    /// Accept out-of-set labels, defaulting them to `Other` / `Neutral`.
    pub fn with_lenient_labels(mut self, lenient: bool) -> Self {
        self.lenient_labels = lenient;
        self
    }

    pub fn backend(&self) -> &Arc<dyn GenerationBackend> {
        &self.backend
    }

    /// Classify `description` through the model.
    #[instrument(skip(self, description), fields(subsystem = "inference", component = "invoker", op = "invoke", model = %self.backend.model_name()))]
    pub async fn invoke(&self, description: &str) -> Result<ClassificationResult, ModelUnavailable> {
        let prompt = classification_prompt(description);
        let max_attempts = self.policy.max_attempts.max(1);
        let attempts = AtomicU32::new(0);

        let run = {
            let (invoker, prompt, attempts) = (self, prompt.as_str(), &attempts);
            move || async move {
                let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
                let start = Instant::now();
                let outcome = invoker.attempt(prompt).await;
                if let Ok(result) = &outcome {
                    debug!(
                        attempt,
                        duration_ms = start.elapsed().as_millis() as u64,
                        category = %result.category,
                        sentiment = %result.sentiment,
                        "Model classification succeeded"
                    );
                }
                outcome
            }
        };

        run.retry(self.policy.backoff())
            .sleep(tokio::time::sleep)
            .notify(|err: &AttemptError, delay: Duration| {
                warn!(
                    attempt = attempts.load(Ordering::Relaxed),
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Model attempt failed, retrying"
                );
            })
            .await
            .map_err(|last_error| ModelUnavailable {
                attempts: attempts.load(Ordering::Relaxed),
                last_error,
            })
    }

    async fn attempt(&self, prompt: &str) -> Result<ClassificationResult, AttemptError> {
        let raw = tokio::time::timeout(self.policy.attempt_timeout, self.backend.generate(prompt))
            .await
            .map_err(|_| AttemptError::Timeout(self.policy.attempt_timeout))??;

        let labels = parse_classification(&raw)?;
        if self.lenient_labels {
            Ok(labels.with_defaults())
        } else {
            Ok(labels.validate()?)
        }
    }
}
