use super::{LlmClient, client::require_api_key, types::*};
use crate::{Error, Result, config::LlmConfig};
use async_trait::async_trait;
use tracing::{debug, error};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` over plain HTTP.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        require_api_key(&config)?;

        let base_url = if config.base_url.is_empty() {
            DEFAULT_GEMINI_BASE_URL.to_string()
        } else {
            config.base_url.trim_end_matches('/').to_string()
        };

        debug!("Creating Gemini client for: {}", base_url);

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: config.api_key,
            model: config.model,
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_structured(&self, request: StructuredRequest) -> Result<String> {
        let body = GenerateContentRequest::from_structured(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Failed to send Gemini request: {}", e)))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| Error::llm(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorEnvelope>(&payload) {
                Ok(envelope) => envelope.error.message,
                Err(_) => payload,
            };
            error!("Gemini API returned {}: {}", status, message);
            return Err(Error::llm(format!(
                "Gemini API returned {}: {}",
                status, message
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&payload)
            .map_err(|e| Error::llm(format!("Failed to parse Gemini response: {}", e)))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(Error::llm(format!("Prompt was blocked: {}", reason)));
        }

        debug!(
            "Received Gemini response with {} candidates (finish reason: {:?})",
            parsed.candidates.len(),
            parsed.finish_reason()
        );

        Ok(parsed.text())
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
