use super::{
    contract,
    types::{PredictionOutcome, PredictionRequest},
};
use crate::{
    Result,
    config::LlmConfig,
    llm::{LlmClient, StructuredRequest, create_llm_client},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Runs one prediction per call against the configured model.
#[derive(Clone)]
pub struct PredictionClient {
    llm: Arc<dyn LlmClient>,
}

impl PredictionClient {
    /// Fails when the configuration carries no API key.
    pub fn new(config: LlmConfig) -> Result<Self> {
        Ok(Self::with_llm_client(create_llm_client(config)?))
    }

    pub fn with_llm_client(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn model(&self) -> String {
        self.llm.model()
    }

    /// Validates the input, calls the model once, and classifies the result.
    ///
    /// Never fails: every error is folded into [`PredictionOutcome::Error`].
    pub async fn request_prediction(
        &self,
        match_url: &str,
        half_time_home: Option<u32>,
        half_time_away: Option<u32>,
    ) -> PredictionOutcome {
        match PredictionRequest::new(match_url, half_time_home, half_time_away) {
            Ok(request) => self.predict(&request).await,
            Err(e) => {
                debug!("Rejected prediction input: {}", e);
                PredictionOutcome::Error(e.into())
            }
        }
    }

    pub async fn predict(&self, request: &PredictionRequest) -> PredictionOutcome {
        let request_id = Uuid::new_v4();
        info!(
            "Prediction {} started for {} (half-time: {:?})",
            request_id,
            request.match_url(),
            request.half_time()
        );

        let outcome = match self.call_model(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Prediction {} failed: {}", request_id, e);
                PredictionOutcome::Error(e.into())
            }
        };

        match &outcome {
            PredictionOutcome::Prediction(p) => info!(
                "Prediction {} settled: {} vs {} ({}-{})",
                request_id,
                p.home_team,
                p.away_team,
                p.most_likely_score.home,
                p.most_likely_score.away
            ),
            PredictionOutcome::Error(e) => {
                warn!("Prediction {} settled with error: {}", request_id, e.error)
            }
        }

        outcome
    }

    async fn call_model(&self, request: &PredictionRequest) -> Result<PredictionOutcome> {
        let structured = StructuredRequest {
            system_instruction: contract::SYSTEM_INSTRUCTION.to_string(),
            prompt: contract::build_prompt(request),
            response_schema: contract::response_schema(),
            temperature: contract::TEMPERATURE,
        };

        let text = self.llm.generate_structured(structured).await?;
        debug!("Model returned {} bytes", text.len());

        contract::parse_response(&text)
    }
}
