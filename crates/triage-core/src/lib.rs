//! # triage-core
//!
//! Core types, traits, and abstractions for the ticket triage service.
//!
//! This crate provides the canonical label types, the label normalizer, the
//! keyword-driven heuristic classifier and the trait definitions that the
//! store and inference crates implement.

pub mod defaults;
pub mod error;
pub mod heuristic;
pub mod labels;
pub mod models;
pub mod traits;
pub mod vocabulary;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use heuristic::{HeuristicClassifier, HeuristicSignals};
pub use labels::{normalize_category, normalize_sentiment};
pub use models::*;
pub use traits::*;
pub use vocabulary::Vocabulary;
