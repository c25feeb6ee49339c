use crate::prediction::PredictionState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub match_url: String,
    #[serde(default)]
    pub half_time_home: Option<i64>,
    #[serde(default)]
    pub half_time_away: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub busy: bool,
    pub generation: u64,
    pub view: PredictionState,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
