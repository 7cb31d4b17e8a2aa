//! Label normalization.
//!
//! Models and humans spell labels many ways ("facturación", "invoice",
//! "BILLING"). These tables fold the known spellings onto the canonical
//! names; anything unknown passes through untouched so the caller can reject
//! it with `Category::from_str` / `Sentiment::from_str`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::{Category, Sentiment};

static CATEGORY_SYNONYMS: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    let table: &[(&[&str], Category)] = &[
        (
            &[
                "technical",
                "tech",
                "técnico",
                "tecnico",
                "técnica",
                "tecnica",
                "soporte técnico",
                "soporte tecnico",
                "technical support",
            ],
            Category::Technical,
        ),
        (
            &[
                "billing",
                "invoice",
                "invoicing",
                "payment",
                "payments",
                "facturación",
                "facturacion",
                "factura",
                "pago",
                "pagos",
                "cobro",
            ],
            Category::Billing,
        ),
        (
            &[
                "commercial",
                "sales",
                "sale",
                "comercial",
                "ventas",
                "venta",
            ],
            Category::Commercial,
        ),
        (
            &["other", "otro", "otra", "otros", "general", "misc"],
            Category::Other,
        ),
    ];
    table
        .iter()
        .flat_map(|(words, category)| words.iter().map(move |w| (*w, *category)))
        .collect()
});

static SENTIMENT_SYNONYMS: Lazy<HashMap<&'static str, Sentiment>> = Lazy::new(|| {
    let table: &[(&[&str], Sentiment)] = &[
        (
            &["positive", "positivo", "positiva", "pos"],
            Sentiment::Positive,
        ),
        (&["neutral", "neutro", "neutra"], Sentiment::Neutral),
        (
            &["negative", "negativo", "negativa", "neg"],
            Sentiment::Negative,
        ),
    ];
    table
        .iter()
        .flat_map(|(words, sentiment)| words.iter().map(move |w| (*w, *sentiment)))
        .collect()
});

/// Map a category label onto its canonical name, or return it unchanged.
pub fn normalize_category(raw: &str) -> &str {
    match CATEGORY_SYNONYMS.get(raw.trim().to_lowercase().as_str()) {
        Some(category) => category.as_str(),
        None => raw,
    }
}

/// Map a sentiment label onto its canonical name, or return it unchanged.
pub fn normalize_sentiment(raw: &str) -> &str {
    match SENTIMENT_SYNONYMS.get(raw.trim().to_lowercase().as_str()) {
        Some(sentiment) => sentiment.as_str(),
        None => raw,
    }
}
