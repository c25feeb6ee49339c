//! The fixed contract every prediction call is made under: the system
//! instruction, the response schema, the sampling temperature, and the rules
//! for turning the model's text back into a [`PredictionOutcome`].

use super::types::{ErrorKind, Prediction, PredictionError, PredictionOutcome, PredictionRequest};
use crate::{Error, Result};
use serde_json::{Value, json};

pub const TEMPERATURE: f32 = 0.5;

pub const SYSTEM_INSTRUCTION: &str = "You are D7A0HO, an expert football intelligence system. Your task is to analyze a football match from a given SofaScore or BeSoccer URL and provide a detailed, data-driven prediction.
- First, identify the home and away teams from the URL.
- Research their recent form (last 5-10 matches), head-to-head (H2H) history, and current league standing.
- Identify the city of the match to infer potential weather conditions.
- Synthesize all this information into a probabilistic forecast.
- If half-time scores are provided, adjust your second-half prediction accordingly, noting that the dynamics of the game have changed.
- Provide your final analysis in the exact JSON format defined by the schema. The analysis text should be concise but insightful.";

/// Response schema in Gemini's OpenAPI-subset form.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "homeTeam": { "type": "STRING", "description": "Full name of the home team." },
            "awayTeam": { "type": "STRING", "description": "Full name of the away team." },
            "mostLikelyScore": {
                "type": "OBJECT",
                "properties": {
                    "home": { "type": "INTEGER", "description": "Predicted goals for the home team." },
                    "away": { "type": "INTEGER", "description": "Predicted goals for the away team." },
                    "probability": { "type": "NUMBER", "description": "Probability of this exact score (0.0 to 1.0)." }
                },
                "required": ["home", "away", "probability"]
            },
            "hdaProbability": {
                "type": "OBJECT",
                "properties": {
                    "homeWin": { "type": "NUMBER", "description": "Probability of home team winning (0.0 to 1.0)." },
                    "draw": { "type": "NUMBER", "description": "Probability of a draw (0.0 to 1.0)." },
                    "awayWin": { "type": "NUMBER", "description": "Probability of away team winning (0.0 to 1.0)." }
                },
                "required": ["homeWin", "draw", "awayWin"]
            },
            "overUnder": {
                "type": "OBJECT",
                "properties": {
                    "over1_5": { "type": "NUMBER", "description": "Probability of total goals being over 1.5 (0.0 to 1.0)." },
                    "over2_5": { "type": "NUMBER", "description": "Probability of total goals being over 2.5 (0.0 to 1.0)." }
                },
                "required": ["over1_5", "over2_5"]
            },
            "weather": {
                "type": "OBJECT",
                "properties": {
                    "condition": { "type": "STRING", "description": "Brief description of the weather conditions (e.g., 'Clear, 15°C'). If unknown, state 'Not available'." },
                    "impact": { "type": "STRING", "description": "How the weather might impact the game (e.g., 'Ideal conditions' or 'Rain may slow down play')." }
                },
                "required": ["condition", "impact"]
            },
            "analysis": { "type": "STRING", "description": "A detailed analysis (3-4 sentences) explaining the prediction. Mention team form, H2H record, and key players if relevant." }
        },
        "required": ["homeTeam", "awayTeam", "mostLikelyScore", "hdaProbability", "overUnder", "weather", "analysis"]
    })
}

pub fn build_prompt(request: &PredictionRequest) -> String {
    let mut prompt = format!("Analyze the match from this URL: {}", request.match_url());

    if let Some(ht) = request.half_time() {
        prompt.push_str(&format!(
            "\nThe match is at half-time with the score: Home {} - {} Away. Please adjust your prediction for the final result based on this HT score.",
            ht.home, ht.away
        ));
    }

    prompt
}

/// Interprets the model's raw text.
///
/// Blank text, unparseable JSON, and objects that do not satisfy the
/// schema are errors. An object carrying a string `error` field is the
/// model reporting a failure and is passed through as such.
pub fn parse_response(raw: &str) -> Result<PredictionOutcome> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Error::EmptyResponse);
    }

    let value: Value = serde_json::from_str(text)?;
    classify(value)
}

pub fn classify(value: Value) -> Result<PredictionOutcome> {
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Ok(PredictionOutcome::Error(PredictionError::new(
            ErrorKind::Reported,
            message,
        )));
    }

    let prediction: Prediction =
        serde_json::from_value(value).map_err(|e| Error::malformed(e.to_string()))?;
    prediction.validate()?;

    Ok(PredictionOutcome::Prediction(Box::new(prediction)))
}
