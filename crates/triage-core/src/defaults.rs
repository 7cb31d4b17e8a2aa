//! Centralized default constants for the triage service.
//!
//! **This module is the single source of truth** for shared default values.
//! Config loaders in other crates reference these constants instead of
//! defining their own magic numbers.

// =============================================================================
// TICKETS
// =============================================================================

/// Minimum description length, in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Hugging Face Inference API base URL.
pub const HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co";

/// Default Hugging Face model repository.
pub const HUGGINGFACE_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default Ollama generation model.
pub const OLLAMA_GEN_MODEL: &str = "mistral:7b-instruct";

/// Sampling temperature for classification requests.
pub const GEN_TEMPERATURE: f32 = 0.2;

/// Token ceiling for a classification response.
pub const GEN_MAX_NEW_TOKENS: u32 = 200;

/// Per-attempt model timeout (seconds).
pub const LLM_TIMEOUT_SECS: u64 = 30;

/// Timeout for backend health checks (seconds).
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// RETRY
// =============================================================================

/// Maximum model attempts per classification, first call included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt (milliseconds). Doubles per attempt.
pub const RETRY_BASE_DELAY_MS: u64 = 2_000;

/// Upper bound on a single backoff sleep (milliseconds).
pub const RETRY_MAX_DELAY_MS: u64 = 10_000;

// =============================================================================
// HEURISTIC
// =============================================================================

/// Strong-positive word hits needed to call a ticket positive outright.
pub const STRONG_POSITIVE_THRESHOLD: usize = 2;

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 8000;

/// Default PostgreSQL connection string.
pub const DATABASE_URL: &str = "postgres://localhost/triage";
