//! Inference configuration.
//!
//! Loaded from environment variables at startup. A config that passes
//! `validate()` always builds a working classifier, so per-request code never
//! sees configuration errors.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `TRIAGE_BACKEND` | `huggingface` |
//! | `HUGGINGFACE_API_KEY` | required for `huggingface` |
//! | `HUGGINGFACE_MODEL` | `mistralai/Mistral-7B-Instruct-v0.2` |
//! | `HUGGINGFACE_BASE_URL` | `https://api-inference.huggingface.co` |
//! | `OLLAMA_BASE` | `http://127.0.0.1:11434` |
//! | `OLLAMA_GEN_MODEL` | `mistral:7b-instruct` |
//! | `LLM_TIMEOUT` | `30` (seconds) |
//! | `MAX_RETRIES` | `3` (attempts) |
//! | `RETRY_BASE_DELAY_MS` | `2000` |
//! | `RETRY_MAX_DELAY_MS` | `10000` |
//! | `TRIAGE_LENIENT_LABELS` | `false` |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use triage_core::{defaults, GenerationBackend, HeuristicClassifier};

use crate::classifier::TicketClassifier;
use crate::retry::{ModelInvoker, RetryPolicy};

/// Errors raised while loading or applying inference configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid backend '{0}': expected 'huggingface' or 'ollama'")]
    InvalidBackend(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend '{0}' is not compiled in")]
    BackendDisabled(BackendKind),

    #[error("Failed to build backend: {0}")]
    Backend(#[from] triage_core::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Which model service to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    HuggingFace,
    Ollama,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::HuggingFace => "huggingface",
            BackendKind::Ollama => "ollama",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(BackendKind::HuggingFace),
            "ollama" => Ok(BackendKind::Ollama),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

/// Hugging Face Inference API settings.
#[derive(Clone, PartialEq, Eq)]
pub struct HuggingFaceConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::HUGGINGFACE_URL.to_string(),
            model: defaults::HUGGINGFACE_MODEL.to_string(),
            api_key: None,
        }
    }
}

// Keep the token out of logs.
impl fmt::Debug for HuggingFaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Ollama settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OLLAMA_URL.to_string(),
            model: defaults::OLLAMA_GEN_MODEL.to_string(),
        }
    }
}

/// Complete inference configuration.
#[derive(Debug, Clone, Default)]
pub struct InferenceConfig {
    pub backend: BackendKind,
    pub huggingface: HuggingFaceConfig,
    pub ollama: OllamaConfig,
    pub retry: RetryPolicy,
    pub lenient_labels: bool,
}

impl InferenceConfig {
    /// Load from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, test map).
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(backend) = get("TRIAGE_BACKEND") {
            config.backend = backend.parse()?;
        }

        if let Some(url) = get("HUGGINGFACE_BASE_URL") {
            config.huggingface.base_url = url;
        }
        if let Some(model) = get("HUGGINGFACE_MODEL") {
            config.huggingface.model = model;
        }
        config.huggingface.api_key = get("HUGGINGFACE_API_KEY");

        if let Some(url) = get("OLLAMA_BASE") {
            config.ollama.base_url = url;
        }
        if let Some(model) = get("OLLAMA_GEN_MODEL") {
            config.ollama.model = model;
        }

        if let Some(secs) = get("LLM_TIMEOUT") {
            config.retry.attempt_timeout = Duration::from_secs(parse_number("LLM_TIMEOUT", &secs)?);
        }
        if let Some(attempts) = get("MAX_RETRIES") {
            config.retry.max_attempts = parse_number("MAX_RETRIES", &attempts)?;
        }
        if let Some(ms) = get("RETRY_BASE_DELAY_MS") {
            config.retry.base_delay =
                Duration::from_millis(parse_number("RETRY_BASE_DELAY_MS", &ms)?);
        }
        if let Some(ms) = get("RETRY_MAX_DELAY_MS") {
            config.retry.max_delay = Duration::from_millis(parse_number("RETRY_MAX_DELAY_MS", &ms)?);
        }
        if let Some(flag) = get("TRIAGE_LENIENT_LABELS") {
            config.lenient_labels = parse_bool("TRIAGE_LENIENT_LABELS", &flag)?;
        }

        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// The retry policy is checked before the backend settings, so a bad
    /// policy is reported even when the model credential is also missing.
    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_retry()?;

        match self.backend {
            BackendKind::HuggingFace => {
                if self.huggingface.api_key.is_none() {
                    return Err(ConfigError::Missing("HUGGINGFACE_API_KEY"));
                }
                if self.huggingface.model.is_empty() {
                    return Err(ConfigError::Missing("HUGGINGFACE_MODEL"));
                }
                check_url("HUGGINGFACE_BASE_URL", &self.huggingface.base_url)?;
            }
            BackendKind::Ollama => {
                if self.ollama.model.is_empty() {
                    return Err(ConfigError::Missing("OLLAMA_GEN_MODEL"));
                }
                check_url("OLLAMA_BASE", &self.ollama.base_url)?;
            }
        }
        Ok(())
    }

    fn validate_retry(&self) -> ConfigResult<()> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "MAX_RETRIES must be at least 1".to_string(),
            ));
        }
        if self.retry.attempt_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "LLM_TIMEOUT must be greater than 0".to_string(),
            ));
        }
        if self.retry.base_delay > self.retry.max_delay {
            return Err(ConfigError::Validation(format!(
                "RETRY_BASE_DELAY_MS ({}) exceeds RETRY_MAX_DELAY_MS ({})",
                self.retry.base_delay.as_millis(),
                self.retry.max_delay.as_millis()
            )));
        }
        Ok(())
    }

    /// Whether the selected backend has the settings it needs.
    pub fn model_configured(&self) -> bool {
        self.validate().is_ok()
    }

    /// Build the selected generation backend.
    pub fn build_backend(&self) -> ConfigResult<Arc<dyn GenerationBackend>> {
        self.validate()?;

        // The client-level timeout sits just above the per-attempt timeout
        // so the invoker's own deadline fires first.
        let client_timeout = self
            .retry
            .attempt_timeout
            .saturating_add(Duration::from_secs(1));

        match self.backend {
            #[cfg(feature = "huggingface")]
            BackendKind::HuggingFace => {
                let api_key = self
                    .huggingface
                    .api_key
                    .clone()
                    .ok_or(ConfigError::Missing("HUGGINGFACE_API_KEY"))?;
                let backend = crate::huggingface::HuggingFaceBackend::with_config(
                    self.huggingface.base_url.clone(),
                    self.huggingface.model.clone(),
                    api_key,
                    client_timeout,
                )?;
                Ok(Arc::new(backend))
            }
            #[cfg(feature = "ollama")]
            BackendKind::Ollama => {
                let backend = crate::ollama::OllamaBackend::with_config(
                    self.ollama.base_url.clone(),
                    self.ollama.model.clone(),
                    client_timeout,
                )?;
                Ok(Arc::new(backend))
            }
            #[allow(unreachable_patterns)]
            other => Err(ConfigError::BackendDisabled(other)),
        }
    }

    /// Build the full classifier: backend, retry policy and label mode.
    ///
    /// A missing credential is not fatal: the classifier is built
    /// heuristic-only and health reporting shows the model as unconfigured.
    pub fn build_classifier(
        &self,
        heuristic: Arc<HeuristicClassifier>,
    ) -> ConfigResult<TicketClassifier> {
        if let Err(ConfigError::Missing(key)) = self.validate() {
            warn!(
                subsystem = "inference",
                backend = %self.backend,
                missing = key,
                "Model not configured, classifying with heuristic only"
            );
            return Ok(TicketClassifier::heuristic_only(heuristic));
        }

        let backend = self.build_backend()?;
        info!(
            subsystem = "inference",
            backend = %self.backend,
            model = backend.model_name(),
            max_attempts = self.retry.max_attempts,
            timeout_secs = self.retry.attempt_timeout.as_secs(),
            lenient_labels = self.lenient_labels,
            "Classifier configured"
        );
        Ok(self.classifier_for(backend, heuristic))
    }

    /// Wire an already-built backend with this config's retry policy and
    /// label mode.
    pub fn classifier_for(
        &self,
        backend: Arc<dyn GenerationBackend>,
        heuristic: Arc<HeuristicClassifier>,
    ) -> TicketClassifier {
        let invoker =
            ModelInvoker::new(backend, self.retry).with_lenient_labels(self.lenient_labels);
        TicketClassifier::new(invoker, heuristic)
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn check_url(key: &'static str, url: &str) -> ConfigResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: url.to_string(),
        })
    }
}
