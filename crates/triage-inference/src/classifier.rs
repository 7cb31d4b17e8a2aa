//! Ticket classification: model first, heuristic on any model failure.

use std::sync::Arc;

use tracing::{instrument, warn};

use triage_core::{ClassificationOutcome, GenerationBackend, HeuristicClassifier};

use crate::retry::{ModelInvoker, RetryPolicy};

/// Classifies ticket descriptions. Always returns canonical labels.
///
/// Without a model invoker every ticket goes straight to the heuristic.
#[derive(Clone)]
pub struct TicketClassifier {
    invoker: Option<ModelInvoker>,
    heuristic: Arc<HeuristicClassifier>,
}

impl TicketClassifier {
    pub fn new(invoker: ModelInvoker, heuristic: Arc<HeuristicClassifier>) -> Self {
        Self {
            invoker: Some(invoker),
            heuristic,
        }
    }

    /// Classifier with no model configured.
    pub fn heuristic_only(heuristic: Arc<HeuristicClassifier>) -> Self {
        Self {
            invoker: None,
            heuristic,
        }
    }

    /// Classifier over `backend` with default retry policy and heuristic.
    pub fn with_backend(backend: Arc<dyn GenerationBackend>) -> Self {
        Self::new(
            ModelInvoker::new(backend, RetryPolicy::default()),
            Arc::new(HeuristicClassifier::default()),
        )
    }

    /// Classify a description. Never fails: model exhaustion falls back to
    /// the keyword heuristic.
    #[instrument(skip(self, description), fields(subsystem = "inference", component = "classifier", op = "classify", description_len = description.len()))]
    pub async fn classify(&self, description: &str) -> ClassificationOutcome {
        let Some(invoker) = &self.invoker else {
            return self.fallback(description);
        };

        match invoker.invoke(description).await {
            Ok(result) => ClassificationOutcome::model(result),
            Err(e) => {
                warn!(
                    attempts = e.attempts,
                    error = %e.last_error,
                    "Model unavailable, using heuristic classification"
                );
                self.fallback(description)
            }
        }
    }

    fn fallback(&self, description: &str) -> ClassificationOutcome {
        ClassificationOutcome::heuristic(self.heuristic.classify(description))
    }

    /// Whether a model backend is wired in.
    pub fn model_configured(&self) -> bool {
        self.invoker.is_some()
    }

    /// Name of the configured model.
    pub fn model_name(&self) -> Option<&str> {
        self.invoker.as_ref().map(|i| i.backend().model_name())
    }

    /// Whether the model backend currently answers its health check.
    pub async fn model_reachable(&self) -> bool {
        let Some(invoker) = &self.invoker else {
            return false;
        };
        match invoker.backend().health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Model health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedBackend;
    use triage_core::{Category, ClassificationMethod, Sentiment};

    fn classifier(backend: &ScriptedBackend) -> TicketClassifier {
        TicketClassifier::with_backend(Arc::new(backend.clone()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_answer_in_prose_is_used() {
        let backend = ScriptedBackend::new()
            .then_respond(r#"Here you go: {"category":"Facturación","sentiment":"positivo"} thanks"#);
        let outcome = classifier(&backend)
            .classify("Gracias por resolver el cobro de mi factura")
            .await;

        assert_eq!(outcome.method, ClassificationMethod::Model);
        assert_eq!(outcome.result.category, Category::Billing);
        assert_eq!(outcome.result.sentiment, Sentiment::Positive);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_brace_free_answers_fall_back_to_heuristic() {
        let backend = ScriptedBackend::new().with_default_response("I cannot answer that.");
        let outcome = classifier(&backend)
            .classify("El sistema está caído y no puedo iniciar sesión, es un error grave")
            .await;

        assert_eq!(outcome.method, ClassificationMethod::Heuristic);
        assert_eq!(outcome.result.category, Category::Technical);
        assert_eq!(outcome.result.sentiment, Sentiment::Negative);
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_canonical_model_labels_fall_back_to_heuristic() {
        let backend = ScriptedBackend::new()
            .with_default_response(r#"{"category":"Logistics","sentiment":"Negative"}"#);
        let outcome = classifier(&backend).classify("Quisiera una cotización").await;

        assert_eq!(outcome.method, ClassificationMethod::Heuristic);
        assert_eq!(outcome.result.category, Category::Commercial);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_model_falls_back() {
        let backend = ScriptedBackend::new().always_failing();
        let classifier = classifier(&backend);
        let outcome = classifier.classify("Hola, quería saludar al equipo").await;

        assert_eq!(outcome.method, ClassificationMethod::Heuristic);
        assert_eq!(outcome.result.category, Category::Other);
        assert!(!classifier.model_reachable().await);
    }

    #[tokio::test]
    async fn test_heuristic_only_never_reports_model() {
        let classifier = TicketClassifier::heuristic_only(Arc::new(HeuristicClassifier::default()));
        let outcome = classifier.classify("Necesito el reembolso de mi pago").await;

        assert_eq!(outcome.method, ClassificationMethod::Heuristic);
        assert_eq!(outcome.result.category, Category::Billing);
        assert!(!classifier.model_configured());
        assert!(classifier.model_name().is_none());
        assert!(!classifier.model_reachable().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcome_is_always_canonical() {
        let answers = [
            r#"{"category":"Technical","sentiment":"Neutral"}"#,
            r#"{"category":"???","sentiment":"???"}"#,
            "",
            "{not json}",
            r#"{"category":"comercial","sentiment":"negativo"}"#,
        ];
        for answer in answers {
            let backend = ScriptedBackend::new().with_default_response(answer);
            let outcome = classifier(&backend)
                .classify("La factura llegó con un monto incorrecto")
                .await;
            assert!(Category::ALL.contains(&outcome.result.category));
            assert!(Sentiment::ALL.contains(&outcome.result.sentiment));
        }
    }
}
