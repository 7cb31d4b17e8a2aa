//! Domain types for ticket triage.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// CANONICAL LABELS
// =============================================================================

/// Ticket category. The serialized names are the persisted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technical,
    Billing,
    Commercial,
    /// Default bucket when nothing else matches.
    Other,
}

impl Category {
    /// All categories in heuristic priority order.
    pub const ALL: [Category; 4] = [
        Category::Technical,
        Category::Billing,
        Category::Commercial,
        Category::Other,
    ];

    /// Returns the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "Technical",
            Category::Billing => "Billing",
            Category::Commercial => "Commercial",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exact match against the canonical names. Run input through
/// [`crate::normalize_category`] first to accept synonyms.
impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown category: {:?}", s)))
    }
}

/// Ticket sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    /// Default when no rule fires.
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Returns the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown sentiment: {:?}", s)))
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// A validated (category, sentiment) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub sentiment: Sentiment,
}

impl ClassificationResult {
    pub fn new(category: Category, sentiment: Sentiment) -> Self {
        Self {
            category,
            sentiment,
        }
    }
}

/// Which path produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    Model,
    Heuristic,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::Model => "model",
            ClassificationMethod::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification plus provenance. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub method: ClassificationMethod,
}

impl ClassificationOutcome {
    pub fn model(result: ClassificationResult) -> Self {
        Self {
            result,
            method: ClassificationMethod::Model,
        }
    }

    pub fn heuristic(result: ClassificationResult) -> Self {
        Self {
            result,
            method: ClassificationMethod::Heuristic,
        }
    }
}

// =============================================================================
// TICKETS
// =============================================================================

/// A support ticket as held by the ticket store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub description: String,
    pub category: Option<Category>,
    pub sentiment: Option<Sentiment>,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// The committed classification, if any.
    pub fn classification(&self) -> Option<ClassificationResult> {
        match (self.category, self.sentiment) {
            (Some(category), Some(sentiment)) => Some(ClassificationResult::new(category, sentiment)),
            _ => None,
        }
    }
}

/// Request for creating a new ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
    pub description: String,
}

impl CreateTicketRequest {
    /// Build a request, enforcing the description length bounds.
    pub fn new(description: impl Into<String>) -> crate::Result<Self> {
        let description = description.into();
        let len = description.chars().count();
        if len < crate::defaults::DESCRIPTION_MIN_CHARS {
            return Err(Error::InvalidInput(format!(
                "description must be at least {} characters",
                crate::defaults::DESCRIPTION_MIN_CHARS
            )));
        }
        if len > crate::defaults::DESCRIPTION_MAX_CHARS {
            return Err(Error::InvalidInput(format!(
                "description must be at most {} characters",
                crate::defaults::DESCRIPTION_MAX_CHARS
            )));
        }
        Ok(Self { description })
    }
}
