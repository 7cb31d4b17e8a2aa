//! Model response parsing.
//!
//! Models wrap their answer in prose more often than not, so the parser
//! extracts the first flat `{...}` object from the raw text before decoding.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use triage_core::{
    normalize_category, normalize_sentiment, Category, ClassificationResult, Sentiment,
};

/// First brace-delimited object with no nested braces.
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}]*\}").expect("JSON object pattern is valid"));

/// Failure to get label fields out of raw model output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no JSON object in model output")]
    NoJsonObject,

    #[error("invalid JSON object in model output: {0}")]
    InvalidJson(String),
}

/// Model labels outside the canonical sets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("non-canonical labels: category={category:?}, sentiment={sentiment:?}")]
pub struct LabelError {
    pub category: String,
    pub sentiment: String,
}

/// Normalized label strings as the model returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabels {
    pub category: String,
    pub sentiment: String,
}

impl ParsedLabels {
    /// Canonical category, if the normalized label is one.
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    /// Canonical sentiment, if the normalized label is one.
    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment.parse().ok()
    }

    /// Strict view: both labels must be canonical.
    pub fn validate(&self) -> Result<ClassificationResult, LabelError> {
        match (self.category(), self.sentiment()) {
            (Some(category), Some(sentiment)) => Ok(ClassificationResult::new(category, sentiment)),
            _ => Err(LabelError {
                category: self.category.clone(),
                sentiment: self.sentiment.clone(),
            }),
        }
    }

    /// Lenient view: unknown category becomes `Other`, unknown sentiment
    /// becomes `Neutral`.
    pub fn with_defaults(&self) -> ClassificationResult {
        ClassificationResult::new(
            self.category().unwrap_or(Category::Other),
            self.sentiment().unwrap_or(Sentiment::Neutral),
        )
    }
}

/// Extract and normalize the `category`/`sentiment` fields from model output.
///
/// Missing or non-string fields come back as empty strings, which no
/// canonical set contains.
pub fn parse_classification(raw: &str) -> Result<ParsedLabels, ParseError> {
    let object = JSON_OBJECT
        .find(raw)
        .ok_or(ParseError::NoJsonObject)?
        .as_str();

    let value: Value =
        serde_json::from_str(object).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let fields = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidJson("not an object".to_string()))?;

    let field = |name: &str| fields.get(name).and_then(Value::as_str).unwrap_or("");

    Ok(ParsedLabels {
        category: normalize_category(field("category")).to_string(),
        sentiment: normalize_sentiment(field("sentiment")).to_string(),
    })
}
