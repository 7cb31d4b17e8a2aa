//! Keyword vocabulary for the heuristic classifier.
//!
//! The built-in lists are curated Spanish/English support-ticket vocabulary.
//! A YAML file with the same shape replaces them wholesale, which is how
//! tests and deployments swap in their own terms without touching the
//! scorer.
//!
//! All terms are matched against lower-cased text, so they must be lower case
//! themselves; [`Vocabulary::from_yaml_str`] lower-cases on load.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::defaults;
use crate::error::Result;

/// Term lists driving the category and sentiment passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub technical: Vec<String>,
    pub billing: Vec<String>,
    pub commercial: Vec<String>,

    pub positive_resolution_phrases: Vec<String>,
    pub strong_positive: Vec<String>,
    pub positive: Vec<String>,
    pub strong_negative_phrases: Vec<String>,
    pub strong_negative: Vec<String>,
    pub negative: Vec<String>,
    /// Phrases signalling an unresolved or recurring problem.
    pub negative_context_phrases: Vec<String>,

    /// Strong-positive hits that alone make a ticket positive.
    pub strong_positive_threshold: usize,
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            technical: owned(&[
                "error", "bug", "fallo", "falla", "crash", "sistema", "técnico", "conexión",
                "servidor", "base de datos", "código", "aplicación", "app", "software",
                "hardware", "red", "internet", "wifi", "lento", "carga", "timeout", "caído",
                "caída", "inaccesible", "bloqueado", "congelado", "pantalla", "login",
                "contraseña", "acceso", "sesión", "actualización", "versión", "instalación",
                "configuración", "integración", "api", "endpoint",
            ]),
            billing: owned(&[
                "factura", "pago", "cobro", "precio", "dinero", "cargo", "tarjeta", "débito",
                "crédito", "cuenta", "saldo", "balance", "transacción", "reembolso",
                "devolución", "cuota", "mensualidad", "suscripción", "renovación",
                "cancelación", "descuento", "promoción", "iva", "impuesto", "recibo",
                "comprobante", "invoice", "billing", "payment", "refund", "currency", "moneda",
                "divisa", "total", "subtotal", "monto",
            ]),
            commercial: owned(&[
                "compra", "venta", "cotización", "producto", "pedido", "orden", "envío",
                "entrega", "delivery", "shipping", "stock", "inventario", "disponibilidad",
                "agotado", "catálogo", "tienda", "carrito", "checkout", "cliente", "proveedor",
                "distribuidor", "almacén", "logística", "tracking", "rastreo", "garantía",
                "cambio", "servicio", "atención", "asesoría", "consulta", "presupuesto",
                "oferta", "demostración", "demo", "prueba", "muestra", "soporte",
            ]),
            positive_resolution_phrases: owned(&[
                "resolví mi problema",
                "resolvió mi problema",
                "problema resuelto",
                "problema solucionado",
                "muchas gracias",
                "muchísimas gracias",
                "excelente servicio",
                "excelente trabajo",
                "excelente atención",
                "muy profesional",
                "muy satisfecho",
                "estoy encantado",
                "definitivamente recomendaré",
                "recomendaré la plataforma",
            ]),
            strong_positive: owned(&[
                "excelente", "excepcional", "fantástico", "maravilloso", "increíble",
                "espectacular", "encantado", "felicito", "muchísimas", "definitivamente",
            ]),
            positive: owned(&[
                "gracias", "bueno", "perfecto", "genial", "bien", "funciona", "satisfecho",
                "contento", "feliz", "agradecido", "rápido", "eficiente", "útil", "práctico",
                "fácil", "simple", "intuitivo", "claro", "efectivo", "profesional", "amable",
                "cordial", "atento", "servicial", "resuelto", "solucionado", "exitoso",
                "logrado", "cumplido", "recomiendo", "aprecio", "valoro", "admiro",
                "tiempo récord",
            ]),
            strong_negative_phrases: owned(&[
                "perdiendo dinero",
                "no funciona nada",
                "pésimo servicio",
                "muy molesto",
                "es inaceptable",
                "voy a cancelar",
            ]),
            strong_negative: owned(&[
                "urgente", "caído", "caída", "inaceptable", "desastre", "caos", "crítico",
                "grave", "bloqueado", "paralizado",
            ]),
            negative: owned(&[
                "error", "fallo", "falla", "malo", "terrible", "pésimo", "no funciona",
                "no sirve", "no puedo", "imposible", "frustrado", "molesto", "enojado",
                "serio", "perdido", "confundido", "lento", "demora", "retraso", "tardío",
                "incorrecto", "equivocado", "defectuoso", "roto", "dañado", "inútil",
                "horrible", "deficiente", "pobre", "decepcionado", "insatisfecho", "queja",
                "reclamo",
            ]),
            negative_context_phrases: owned(&[
                "sigue sin",
                "todavía no",
                "aún no",
                "sin respuesta",
                "nadie responde",
                "otra vez",
                "de nuevo el mismo",
            ]),
            strong_positive_threshold: defaults::STRONG_POSITIVE_THRESHOLD,
        }
    }
}

impl Vocabulary {
    /// Parse a YAML vocabulary. Omitted lists fall back to the built-in ones.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut vocab: Vocabulary = serde_yaml::from_str(yaml)?;
        vocab.lowercase_terms();
        Ok(vocab)
    }

    /// Load a YAML vocabulary file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let vocab = Self::from_yaml_str(&contents)?;
        info!(
            subsystem = "heuristic",
            path = %path.display(),
            "Loaded vocabulary override"
        );
        Ok(vocab)
    }

    fn lowercase_terms(&mut self) {
        for list in [
            &mut self.technical,
            &mut self.billing,
            &mut self.commercial,
            &mut self.positive_resolution_phrases,
            &mut self.strong_positive,
            &mut self.positive,
            &mut self.strong_negative_phrases,
            &mut self.strong_negative,
            &mut self.negative,
            &mut self.negative_context_phrases,
        ] {
            for term in list.iter_mut() {
                *term = term.to_lowercase();
            }
        }
    }
}
