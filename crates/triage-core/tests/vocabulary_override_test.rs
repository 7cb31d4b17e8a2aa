//! A YAML vocabulary replaces the built-in keyword lists without touching
//! classifier logic.

use std::io::Write;

use triage_core::{Category, HeuristicClassifier, Sentiment, Vocabulary};

const SHIPPING_VOCABULARY: &str = r#"
technical: ["firmware"]
billing: ["Aduana"]
commercial: ["paquete"]
positive_resolution_phrases: []
strong_positive: []
positive: ["llegó"]
strong_negative_phrases: ["paquete perdido"]
strong_negative: []
negative: []
negative_context_phrases: []
strong_positive_threshold: 1
"#;

#[test]
fn test_file_vocabulary_drives_classification() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHIPPING_VOCABULARY.as_bytes()).unwrap();

    let vocabulary = Vocabulary::from_file(file.path()).unwrap();
    let classifier = HeuristicClassifier::new(vocabulary);

    let lost = classifier.classify("Mi paquete perdido nunca apareció");
    assert_eq!(lost.category, Category::Commercial);
    assert_eq!(lost.sentiment, Sentiment::Negative);

    // Terms are matched case-insensitively after loading.
    let customs = classifier.classify("Pagué la ADUANA dos veces");
    assert_eq!(customs.category, Category::Billing);

    // Built-in words no longer apply.
    let old = classifier.classify("El sistema está caído, error grave");
    assert_eq!(old.category, Category::Other);
    assert_eq!(old.sentiment, Sentiment::Neutral);
}

#[test]
fn test_partial_vocabulary_keeps_builtin_lists() {
    let vocabulary = Vocabulary::from_yaml_str("technical: [\"firmware\"]\n").unwrap();
    let classifier = HeuristicClassifier::new(vocabulary);

    assert_eq!(
        classifier.classify("Actualicé el firmware del router").category,
        Category::Technical
    );
    // Billing list is still the built-in one.
    assert_eq!(
        classifier.classify("Necesito una copia de mi factura").category,
        Category::Billing
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Vocabulary::from_file(std::path::Path::new("/nonexistent/vocab.yaml")).unwrap_err();
    assert!(matches!(err, triage_core::Error::Io(_)));
}
