//! Deterministic keyword classifier.
//!
//! Used whenever the model path fails. It has a default for every input,
//! so it never fails itself.
//!
//! Category: technical, billing, commercial lists are checked in that order
//! and the first list with any hit wins (a ticket mentioning both an error
//! and an invoice is technical). No hit leaves [`Category::Other`].
//!
//! Sentiment: presence tallies over the vocabulary's lists feed an ordered,
//! negative-leaning cascade. Rule order decides mixed-text outcomes; see
//! [`HeuristicSignals::sentiment`].

use serde::Serialize;
use tracing::debug;

use crate::models::{Category, ClassificationResult, Sentiment};
use crate::vocabulary::Vocabulary;

/// Per-list hit counts for one text. Each term counts at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeuristicSignals {
    pub resolution_phrases: usize,
    pub strong_positive: usize,
    pub positive: usize,
    pub strong_negative_phrases: usize,
    pub strong_negative: usize,
    pub negative: usize,
    pub negative_context: usize,
}

impl HeuristicSignals {
    /// Apply the sentiment cascade. First matching rule wins.
    pub fn sentiment(&self, strong_positive_threshold: usize) -> Sentiment {
        if self.resolution_phrases > 0 || self.strong_positive >= strong_positive_threshold {
            return Sentiment::Positive;
        }
        if self.strong_negative_phrases > 0 || self.strong_negative > 0 || self.negative_context > 0
        {
            return Sentiment::Negative;
        }
        if self.negative >= 2 {
            return Sentiment::Negative;
        }
        if self.positive >= 3 && self.positive > self.negative + 1 {
            return Sentiment::Positive;
        }
        if self.negative > 0 && self.positive <= 1 {
            return Sentiment::Negative;
        }
        Sentiment::Neutral
    }
}

fn hits(text: &str, terms: &[String]) -> usize {
    terms.iter().filter(|t| text.contains(t.as_str())).count()
}

fn any_hit(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| text.contains(t.as_str()))
}

/// Keyword-scoring classifier over an immutable [`Vocabulary`].
#[derive(Debug, Clone, Default)]
pub struct HeuristicClassifier {
    vocabulary: Vocabulary,
}

impl HeuristicClassifier {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Classify free text.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        self.classify_with_signals(text).0
    }

    /// Classify and also return the sentiment tallies that drove the decision.
    pub fn classify_with_signals(&self, text: &str) -> (ClassificationResult, HeuristicSignals) {
        let lowered = text.to_lowercase();
        let category = self.category(&lowered);
        let signals = self.signals(&lowered);
        let sentiment = signals.sentiment(self.vocabulary.strong_positive_threshold);

        debug!(
            subsystem = "heuristic",
            op = "classify",
            %category,
            %sentiment,
            resolution = signals.resolution_phrases,
            strong_pos = signals.strong_positive,
            pos = signals.positive,
            strong_neg_phrases = signals.strong_negative_phrases,
            strong_neg = signals.strong_negative,
            neg = signals.negative,
            neg_context = signals.negative_context,
            "Heuristic classification"
        );

        (ClassificationResult::new(category, sentiment), signals)
    }

    fn category(&self, lowered: &str) -> Category {
        let vocab = &self.vocabulary;
        if any_hit(lowered, &vocab.technical) {
            Category::Technical
        } else if any_hit(lowered, &vocab.billing) {
            Category::Billing
        } else if any_hit(lowered, &vocab.commercial) {
            Category::Commercial
        } else {
            Category::Other
        }
    }

    fn signals(&self, lowered: &str) -> HeuristicSignals {
        let vocab = &self.vocabulary;
        HeuristicSignals {
            resolution_phrases: hits(lowered, &vocab.positive_resolution_phrases),
            strong_positive: hits(lowered, &vocab.strong_positive),
            positive: hits(lowered, &vocab.positive),
            strong_negative_phrases: hits(lowered, &vocab.strong_negative_phrases),
            strong_negative: hits(lowered, &vocab.strong_negative),
            negative: hits(lowered, &vocab.negative),
            negative_context: hits(lowered, &vocab.negative_context_phrases),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HeuristicClassifier {
        HeuristicClassifier::default()
    }

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    /// Vocabulary with every list empty, so a test's own terms are the only signal.
    fn empty() -> Vocabulary {
        Vocabulary {
            technical: vec![],
            billing: vec![],
            commercial: vec![],
            positive_resolution_phrases: vec![],
            strong_positive: vec![],
            positive: vec![],
            strong_negative_phrases: vec![],
            strong_negative: vec![],
            negative: vec![],
            negative_context_phrases: vec![],
            strong_positive_threshold: 2,
        }
    }

    // ==========================================================================
    // Scenarios
    // ==========================================================================

    #[test]
    fn test_outage_with_critical_error_is_technical_negative() {
        let result = classifier().classify("El sistema está caído y no puedo acceder, error crítico");
        assert_eq!(result.category, Category::Technical);
        assert_eq!(result.sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_resolution_phrase_is_positive() {
        let result = classifier().classify("Muchas gracias, excelente atención, problema resuelto");
        assert_eq!(result.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_no_keywords_is_other_neutral() {
        let result = classifier().classify("Hola, quisiera saber el horario de sus oficinas");
        assert_eq!(result, ClassificationResult::new(Category::Other, Sentiment::Neutral));
    }

    #[test]
    fn test_empty_text_is_other_neutral() {
        let result = classifier().classify("");
        assert_eq!(result, ClassificationResult::new(Category::Other, Sentiment::Neutral));
    }

    // ==========================================================================
    // Category priority
    // ==========================================================================

    #[test]
    fn test_technical_beats_billing() {
        let result = classifier().classify("La factura muestra un error en el monto");
        assert_eq!(result.category, Category::Technical);
    }

    #[test]
    fn test_billing_beats_commercial() {
        let result = classifier().classify("Quiero un reembolso de mi pedido");
        assert_eq!(result.category, Category::Billing);
    }

    #[test]
    fn test_commercial_only() {
        let result = classifier().classify("Necesito una cotización para comprar más licencias");
        assert_eq!(result.category, Category::Commercial);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let result = classifier().classify("EL SERVIDOR NO RESPONDE");
        assert_eq!(result.category, Category::Technical);
    }

    // ==========================================================================
    // Sentiment cascade (test vocabularies)
    // ==========================================================================

    #[test]
    fn test_strong_positive_threshold() {
        let c = HeuristicClassifier::new(Vocabulary {
            strong_positive: terms(&["wow", "superb"]),
            ..empty()
        });
        assert_eq!(c.classify("wow").sentiment, Sentiment::Neutral);
        assert_eq!(c.classify("wow, superb").sentiment, Sentiment::Positive);

        let c = HeuristicClassifier::new(Vocabulary {
            strong_positive: terms(&["wow", "superb"]),
            strong_positive_threshold: 1,
            ..empty()
        });
        assert_eq!(c.classify("wow").sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_resolution_outranks_strong_negative() {
        let c = HeuristicClassifier::new(Vocabulary {
            positive_resolution_phrases: terms(&["fixed it"]),
            strong_negative: terms(&["outage"]),
            ..empty()
        });
        assert_eq!(c.classify("outage but you fixed it").sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_negative_context_phrase_is_negative() {
        let c = HeuristicClassifier::new(Vocabulary {
            negative_context_phrases: terms(&["still broken"]),
            positive: terms(&["thanks", "great", "good"]),
            ..empty()
        });
        assert_eq!(
            c.classify("thanks, great, good, but still broken").sentiment,
            Sentiment::Negative
        );
    }

    #[test]
    fn test_two_ordinary_negatives_are_negative() {
        let c = HeuristicClassifier::new(Vocabulary {
            negative: terms(&["slow", "wrong"]),
            positive: terms(&["a", "b", "c", "d"]),
            ..empty()
        });
        // rule 3 fires before the positive majority rule
        assert_eq!(c.classify("a b c d slow wrong").sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_positive_majority_needs_three_and_margin() {
        let c = HeuristicClassifier::new(Vocabulary {
            positive: terms(&["nice", "fast", "clear"]),
            negative: terms(&["slow"]),
            ..empty()
        });
        assert_eq!(c.classify("nice fast clear").sentiment, Sentiment::Positive);
        // 3 positive vs 1 negative: margin 2 > 1
        assert_eq!(c.classify("nice fast clear slow").sentiment, Sentiment::Positive);
        // 2 positive: rule 4 needs 3, rule 5 needs pos <= 1
        assert_eq!(c.classify("nice fast").sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_single_negative_with_little_positive_is_negative() {
        let c = HeuristicClassifier::new(Vocabulary {
            positive: terms(&["nice", "fast"]),
            negative: terms(&["slow"]),
            ..empty()
        });
        assert_eq!(c.classify("slow").sentiment, Sentiment::Negative);
        assert_eq!(c.classify("nice but slow").sentiment, Sentiment::Negative);
        assert_eq!(c.classify("nice, fast, slow").sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_terms_count_once_regardless_of_repetition() {
        let c = HeuristicClassifier::new(Vocabulary {
            negative: terms(&["slow"]),
            ..empty()
        });
        let (_, signals) = c.classify_with_signals("slow slow slow");
        assert_eq!(signals.negative, 1);
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    #[test]
    fn test_total_and_deterministic() {
        let c = classifier();
        let samples = [
            "",
            "   ",
            "😀😀😀",
            "error error error",
            "Gracias, todo funciona perfecto y rápido",
            "No puedo pagar la factura, la tarjeta falla",
            "Envío retrasado, pedido perdido, servicio pésimo",
            "Quisiera una demo del producto",
        ];
        for text in samples {
            let first = c.classify(text);
            assert!(Category::ALL.contains(&first.category));
            assert!(Sentiment::ALL.contains(&first.sentiment));
            // interleave other calls; output must not depend on history
            c.classify("El sistema está caído");
            assert_eq!(c.classify(text), first, "text {:?}", text);
        }
    }
}
