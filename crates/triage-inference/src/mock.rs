//! Scripted generation backend for deterministic testing.
//!
//! Responses are consumed in order; once the script runs out every call
//! returns the default response. Clones share the script and call log.
//!
//! ## Usage
//!
//! ```rust
//! use triage_inference::mock::ScriptedBackend;
//!
//! let backend = ScriptedBackend::new()
//!     .then_fail("503 Service Unavailable")
//!     .then_respond(r#"{"category":"Billing","sentiment":"Neutral"}"#);
//! assert_eq!(backend.call_count(), 0);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use triage_core::{Error, GenerationBackend, Result};

/// One scripted reply.
#[derive(Debug, Clone)]
enum Step {
    Respond(String),
    Fail(String),
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    calls: Vec<MockCall>,
}

/// A recorded `generate` call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub timestamp: std::time::Instant,
}

/// Mock backend that replays a fixed script.
#[derive(Clone)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
    default_response: Arc<str>,
    model: Arc<str>,
    latency: Duration,
    fail_unscripted: bool,
    healthy: bool,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    /// Create a backend whose default response is a valid classification.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            default_response: Arc::from(r#"{"category":"Other","sentiment":"Neutral"}"#),
            model: Arc::from("scripted-mock"),
            latency: Duration::ZERO,
            fail_unscripted: false,
            healthy: true,
        }
    }

    /// Queue a successful response.
    pub fn then_respond(self, response: impl Into<String>) -> Self {
        self.push(Step::Respond(response.into()));
        self
    }

    /// Queue a backend failure.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Step::Fail(message.into()));
        self
    }

    /// Response returned once the script is exhausted.
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Arc::from(response.into());
        self
    }

    /// Fail every unscripted call and report unhealthy.
    pub fn always_failing(mut self) -> Self {
        self.fail_unscripted = true;
        self.healthy = false;
        self
    }

    /// Simulated latency per call (uses tokio time, so paused clocks apply).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Value reported by `health_check`.
    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// All recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn push(&self, step: Step) {
        self.lock().steps.push_back(step);
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let step = {
            let mut script = self.lock();
            script.calls.push(MockCall {
                prompt: prompt.to_string(),
                timestamp: std::time::Instant::now(),
            });
            script.steps.pop_front()
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(message)) => Err(Error::Inference(message)),
            None if self.fail_unscripted => {
                Err(Error::Inference("scripted backend unavailable".to_string()))
            }
            None => Ok(self.default_response.to_string()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy)
    }
}
