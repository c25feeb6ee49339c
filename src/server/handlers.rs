use super::types::{ErrorResponse, PredictRequest, SessionStatus};
use crate::prediction::{Prediction, PredictionClient, PredictionOutcome, PredictionSession};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{info, warn};

pub const INVALID_HALF_TIME_MESSAGE: &str = "Half-time scores must be non-negative whole numbers.";

#[derive(Clone)]
pub struct AppState {
    pub client: PredictionClient,
    pub session: Arc<PredictionSession>,
}

impl AppState {
    pub fn new(client: PredictionClient) -> Self {
        Self {
            client,
            session: Arc::new(PredictionSession::new()),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Checks the half-time pair. A lone score is ignored, so it is not checked.
fn half_time_scores(
    home: Option<i64>,
    away: Option<i64>,
) -> Result<(Option<u32>, Option<u32>), ApiError> {
    let (Some(home), Some(away)) = (home, away) else {
        return Ok((None, None));
    };

    match (u32::try_from(home), u32::try_from(away)) {
        (Ok(home), Ok(away)) => Ok((Some(home), Some(away))),
        _ => Err(api_error(StatusCode::BAD_REQUEST, INVALID_HALF_TIME_MESSAGE)),
    }
}

pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<Prediction>, ApiError> {
    info!("Received prediction request for: {}", request.match_url);

    let (home, away) = half_time_scores(request.half_time_home, request.half_time_away)?;

    let outcome = state
        .session
        .analyze(&state.client, &request.match_url, home, away)
        .await;

    match outcome {
        PredictionOutcome::Prediction(prediction) => Ok(Json(*prediction)),
        PredictionOutcome::Error(e) if e.is_validation() => {
            Err(api_error(StatusCode::BAD_REQUEST, e.error))
        }
        PredictionOutcome::Error(e) => {
            warn!("Prediction request failed: {}", e.error);
            Err(api_error(StatusCode::BAD_GATEWAY, e.error))
        }
    }
}

pub async fn status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(SessionStatus {
        busy: state.session.is_busy(),
        generation: state.session.generation(),
        view: state.session.state().await,
    })
}

pub async fn health() -> &'static str {
    "ok"
}
