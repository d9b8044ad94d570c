use std::sync::Arc;
use tracing::{info, warn};

use crate::models::game::{Game, GameRequest};
use crate::repositories::event_repository::EventRepository;
use crate::repositories::game_repository::GameRepository;
use crate::services::errors::game_service_errors::GameServiceError;

pub struct GameService {
    repository: Arc<dyn GameRepository + Send + Sync>,
    event_repository: Arc<dyn EventRepository + Send + Sync>,
}

impl GameService {
    pub fn new(
        repository: Arc<dyn GameRepository + Send + Sync>,
        event_repository: Arc<dyn EventRepository + Send + Sync>,
    ) -> Self {
        GameService {
            repository,
            event_repository,
        }
    }

    /// The catalog sorted by title.
    pub async fn list_games(&self) -> Result<Vec<Game>, GameServiceError> {
        let mut games = self.repository.list_games().await?;
        games.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        Ok(games)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Game, GameServiceError> {
        if game_id.is_empty() {
            return Err(GameServiceError::ValidationError(
                "Game ID cannot be empty".to_string(),
            ));
        }
        Ok(self.repository.get_game(game_id).await?)
    }

    pub async fn create_game(&self, request: GameRequest) -> Result<Game, GameServiceError> {
        validate(&request)?;
        let game = Game::new(request);
        self.repository.create_game(&game).await?;
        info!("Game created: {} ({})", game.title, game.id);
        Ok(game)
    }

    pub async fn update_game(
        &self,
        game_id: &str,
        request: GameRequest,
    ) -> Result<Game, GameServiceError> {
        validate(&request)?;
        let mut game = self.get_game(game_id).await?;
        game.apply(request);
        self.repository.update_game(&game).await?;
        Ok(game)
    }

    /// Deletes the game and takes it off every event that offered it.
    pub async fn delete_game(&self, game_id: &str) -> Result<(), GameServiceError> {
        self.repository.delete_game(game_id).await?;

        let events = self
            .event_repository
            .list_events()
            .await
            .map_err(|e| GameServiceError::RepositoryError(e.to_string()))?;
        for mut event in events {
            if event.remove_game(game_id) {
                if let Err(e) = self.event_repository.update_event(&event).await {
                    warn!(
                        "Failed to remove game {} from event {}: {}",
                        game_id, event.id, e
                    );
                    return Err(GameServiceError::RepositoryError(e.to_string()));
                }
            }
        }
        info!("Game deleted: {}", game_id);
        Ok(())
    }
}

fn validate(request: &GameRequest) -> Result<(), GameServiceError> {
    if request.title.trim().is_empty() {
        return Err(GameServiceError::ValidationError(
            "Title cannot be empty".to_string(),
        ));
    }
    if let Some(rating) = request.complexity_rating {
        if !(1.0..=5.0).contains(&rating) {
            return Err(GameServiceError::ValidationError(
                "Complexity rating must be between 1 and 5".to_string(),
            ));
        }
    }
    Ok(())
}
