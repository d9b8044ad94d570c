use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use lambda_http::tracing::{debug, error, warn};
use serde::Serialize;

use crate::{error::ApiError, middleware::auth::AdminUser, state::AppState};
use shared::models::event::{Event, EventRequest};
use shared::models::game::Game;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// An event with its games resolved, in the order the organizer listed them.
#[derive(Debug, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub game_details: Vec<Game>,
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    state.event_service.list_events().await.map(Json).map_err(|e| {
        error!("Failed to list events: {}", e);
        ApiError::from(e)
    })
}

async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<EventDetails>, ApiError> {
    let event = state.event_service.get_event(&event_id).await?;
    let game_details = state.event_service.event_games(&event).await.map_err(|e| {
        error!("Failed to load games of event {}: {}", event_id, e);
        ApiError::from(e)
    })?;
    Ok(Json(EventDetails {
        event,
        game_details,
    }))
}

async fn create_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<EventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.event_service.create_event(request).await.map_err(|e| {
        error!("Failed to create event: {}", e);
        ApiError::from(e)
    })?;
    debug!("Event {} created by {}", event.id, admin.id);
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(event_id): Path<String>,
    Json(request): Json<EventRequest>,
) -> Result<Json<Event>, ApiError> {
    state
        .event_service
        .update_event(&event_id, request)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to update event {}: {}", event_id, e);
            ApiError::from(e)
        })
}

/// Deletes the event, then its participations. If the purge fails the
/// event-cleanup processor finishes it from the table stream.
async fn delete_event(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(event_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.event_service.delete_event(&event_id).await.map_err(|e| {
        error!("Failed to delete event {}: {}", event_id, e);
        ApiError::from(e)
    })?;

    if let Err(e) = state.participation_service.remove_by_event(&event_id).await {
        warn!(
            "Event {} deleted but its participations were not purged: {}",
            event_id, e
        );
    }
    Ok(StatusCode::NO_CONTENT)
}
