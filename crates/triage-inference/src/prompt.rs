//! Classification prompt.
//!
//! The model answers with a single JSON object. Labels are requested in their
//! canonical English form; Spanish answers are still accepted because the
//! parser normalizes synonyms before validation.

use triage_core::{Category, Sentiment};

/// Build the classification prompt for a ticket description.
pub fn classification_prompt(description: &str) -> String {
    let categories = join_labels(Category::ALL.iter().map(|c| c.as_str()));
    let sentiments = join_labels(Sentiment::ALL.iter().map(|s| s.as_str()));

    format!(
        r#"Eres un asistente que clasifica tickets de soporte al cliente.

Analiza el siguiente ticket y devuelve SOLO un objeto JSON con dos campos:
- "category": una de {categories}
- "sentiment": uno de {sentiments}

Criterios:
- Technical: fallos, errores, acceso, rendimiento o configuración del producto.
- Billing: facturas, cobros, pagos, reembolsos o suscripciones.
- Commercial: precios, planes, ventas, cotizaciones o propuestas.
- Other: cualquier otra consulta.

Ticket: "{description}"

Responde únicamente con el JSON, sin texto adicional. Ejemplo:
{{"category": "Technical", "sentiment": "Negative"}}"#,
        categories = categories,
        sentiments = sentiments,
        description = description.trim(),
    )
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}
