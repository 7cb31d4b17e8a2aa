//! Hugging Face Inference API backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use triage_core::{defaults, Error, GenerationBackend, Result};

/// Text-generation backend for the hosted Inference API.
///
/// Prompts are wrapped in the Mistral instruct template (`[INST] ... [/INST]`)
/// and only the completion is returned (`return_full_text = false`).
pub struct HuggingFaceBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_new_tokens: u32,
}

impl HuggingFaceBackend {
    /// Create a backend for `model` at `base_url`, authenticating with `api_key`.
    pub fn with_config(
        base_url: String,
        model: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "huggingface",
            "Initializing Hugging Face backend: url={}, model={}",
            base_url,
            model
        );

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            temperature: defaults::GEN_TEMPERATURE,
            max_new_tokens: defaults::GEN_MAX_NEW_TOKENS,
        })
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

/// Request payload for a text-generation model.
#[derive(Serialize)]
struct GenerationRequest {
    inputs: String,
    parameters: GenerationParameters,
    options: GenerationOptions,
}

#[derive(Serialize)]
struct GenerationParameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Serialize)]
struct GenerationOptions {
    /// Block until a cold model is loaded instead of failing with 503.
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[async_trait]
impl GenerationBackend for HuggingFaceBackend {
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "huggingface", op = "generate", model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let request = GenerationRequest {
            inputs: format!("[INST] {} [/INST]", prompt),
            parameters: GenerationParameters {
                temperature: self.temperature,
                max_new_tokens: self.max_new_tokens,
                return_full_text: false,
            },
            options: GenerationOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(self.model_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Hugging Face returned {}: {}",
                status, body
            )));
        }

        let result: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| Error::Inference("Hugging Face returned no generations".to_string()))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > 10000 {
            warn!(
                duration_ms = elapsed,
                prompt_len = prompt.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.model_url())
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(defaults::HEALTH_CHECK_TIMEOUT_SECS))
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    debug!("Hugging Face health check passed");
                    Ok(true)
                } else {
                    warn!("Hugging Face health check failed: {}", resp.status());
                    Ok(false)
                }
            }
            Err(e) => {
                warn!("Hugging Face health check error: {}", e);
                Ok(false)
            }
        }
    }
}
