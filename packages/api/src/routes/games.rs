use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use lambda_http::tracing::{debug, error};

use crate::{error::ApiError, middleware::auth::AdminUser, state::AppState};
use shared::models::game::{Game, GameRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{game_id}", put(update_game).delete(delete_game))
}

async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, ApiError> {
    state.game_service.list_games().await.map(Json).map_err(|e| {
        error!("Failed to list games: {}", e);
        ApiError::from(e)
    })
}

async fn create_game(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<GameRequest>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let game = state.game_service.create_game(request).await.map_err(|e| {
        error!("Failed to create game: {}", e);
        ApiError::from(e)
    })?;
    debug!("Game {} created by {}", game.id, admin.id);
    Ok((StatusCode::CREATED, Json(game)))
}

async fn update_game(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(game_id): Path<String>,
    Json(request): Json<GameRequest>,
) -> Result<Json<Game>, ApiError> {
    state
        .game_service
        .update_game(&game_id, request)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to update game {}: {}", game_id, e);
            ApiError::from(e)
        })
}

async fn delete_game(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(game_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.game_service.delete_game(&game_id).await.map_err(|e| {
        error!("Failed to delete game {}: {}", game_id, e);
        ApiError::from(e)
    })?;
    Ok(StatusCode::NO_CONTENT)
}
