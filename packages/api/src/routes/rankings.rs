use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use lambda_http::tracing::error;

use crate::{error::ApiError, middleware::auth::AdminUser, state::AppState};
use shared::services::aggregate_rankings::{
    aggregate_rankings, participant_breakdown, GameAggregate, GameBreakdown,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{event_id}/rankings/summary", get(summary))
        .route("/events/{event_id}/rankings/breakdown", get(breakdown))
}

async fn summary(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<GameAggregate>>, ApiError> {
    let event = state.event_service.get_event(&event_id).await?;
    let games = state.event_service.event_games(&event).await?;
    let participations = state
        .participation_service
        .list_for_event(&event_id)
        .await
        .map_err(|e| {
            error!("Failed to load participations of event {}: {}", event_id, e);
            ApiError::from(e)
        })?;
    Ok(Json(aggregate_rankings(&games, &participations)))
}

async fn breakdown(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<GameBreakdown>>, ApiError> {
    let event = state.event_service.get_event(&event_id).await?;
    let games = state.event_service.event_games(&event).await?;
    let participations = state
        .participation_service
        .list_for_event(&event_id)
        .await
        .map_err(|e| {
            error!("Failed to load participations of event {}: {}", event_id, e);
            ApiError::from(e)
        })?;
    let users = state.user_service.list_users().await?;
    Ok(Json(participant_breakdown(&games, &participations, &users)))
}
