//! # triage-inference
//!
//! Model-backed ticket classification for the triage service.
//!
//! This crate provides:
//! - Generation backends for the Hugging Face Inference API and Ollama
//! - The classification prompt and a tolerant response parser
//! - `ModelInvoker`: per-attempt timeout plus exponential backoff retries
//! - `TicketClassifier`: model first, keyword heuristic when the model fails
//! - Environment-driven `InferenceConfig`
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use triage_core::HeuristicClassifier;
//! use triage_inference::InferenceConfig;
//!
//! let config = InferenceConfig::from_env()?;
//! let classifier = config.build_classifier(Arc::new(HeuristicClassifier::default()))?;
//! let outcome = classifier.classify("No puedo acceder a mi cuenta").await;
//! println!("{} / {} via {}", outcome.result.category, outcome.result.sentiment, outcome.method);
//! ```

pub mod classifier;
pub mod config;
pub mod parser;
pub mod prompt;
pub mod retry;

#[cfg(feature = "huggingface")]
pub mod huggingface;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use classifier::TicketClassifier;
pub use config::{
    BackendKind, ConfigError, ConfigResult, HuggingFaceConfig, InferenceConfig, OllamaConfig,
};
pub use parser::{parse_classification, LabelError, ParseError, ParsedLabels};
pub use prompt::classification_prompt;
pub use retry::{AttemptError, ModelInvoker, ModelUnavailable, RetryPolicy};

#[cfg(feature = "huggingface")]
pub use huggingface::HuggingFaceBackend;

#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;

// Re-export core types
pub use triage_core::{
    ClassificationMethod, ClassificationOutcome, ClassificationResult, GenerationBackend,
    HeuristicClassifier,
};
