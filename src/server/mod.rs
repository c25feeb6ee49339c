pub mod handlers;
mod types;

pub use types::{ErrorResponse, PredictRequest, SessionStatus};

use crate::{Result, config::Config, prediction::PredictionClient};
use axum::{
    Router,
    routing::{get, post},
};
use handlers::AppState;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/predict", post(handlers::predict))
        .route("/api/prediction", get(handlers::status))
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Refuses to start without a credential
    let client = PredictionClient::new(config.llm.clone())?;
    info!("Prediction client ready (model: {})", client.model());

    let app = router(AppState::new(client));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
