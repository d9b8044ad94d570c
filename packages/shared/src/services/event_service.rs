use std::sync::Arc;
use tracing::{info, warn};

use crate::models::event::{Event, EventRequest};
use crate::models::game::Game;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::event_repository::EventRepository;
use crate::repositories::game_repository::GameRepository;
use crate::services::errors::event_service_errors::EventServiceError;

pub struct EventService {
    repository: Arc<dyn EventRepository + Send + Sync>,
    game_repository: Arc<dyn GameRepository + Send + Sync>,
}

impl EventService {
    pub fn new(
        repository: Arc<dyn EventRepository + Send + Sync>,
        game_repository: Arc<dyn GameRepository + Send + Sync>,
    ) -> Self {
        EventService {
            repository,
            game_repository,
        }
    }

    /// Events in date order, soonest first.
    pub async fn list_events(&self) -> Result<Vec<Event>, EventServiceError> {
        let mut events = self.repository.list_events().await?;
        events.sort_by_key(|event| event.date);
        Ok(events)
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Event, EventServiceError> {
        if event_id.is_empty() {
            return Err(EventServiceError::ValidationError(
                "Event ID cannot be empty".to_string(),
            ));
        }
        Ok(self.repository.get_event(event_id).await?)
    }

    pub async fn create_event(&self, request: EventRequest) -> Result<Event, EventServiceError> {
        validate(&request)?;
        self.ensure_games_exist(&request.games).await?;
        let event = Event::new(request);
        self.repository.create_event(&event).await?;
        info!("Event created: {} ({})", event.title, event.id);
        Ok(event)
    }

    pub async fn update_event(
        &self,
        event_id: &str,
        request: EventRequest,
    ) -> Result<Event, EventServiceError> {
        validate(&request)?;
        self.ensure_games_exist(&request.games).await?;
        let mut event = self.get_event(event_id).await?;
        event.apply(request);
        self.repository.update_event(&event).await?;
        Ok(event)
    }

    /// Deletes the event record only. Participations are purged by the caller
    /// (or the change-feed processor) through `ParticipationService::remove_by_event`.
    pub async fn delete_event(&self, event_id: &str) -> Result<(), EventServiceError> {
        self.repository.delete_event(event_id).await?;
        info!("Event deleted: {}", event_id);
        Ok(())
    }

    /// The event's games in catalog order. Ids whose game has since been deleted
    /// are skipped.
    pub async fn event_games(&self, event: &Event) -> Result<Vec<Game>, EventServiceError> {
        let mut games = Vec::with_capacity(event.games.len());
        for game_id in &event.games {
            match self.game_repository.get_game(game_id).await {
                Ok(game) => games.push(game),
                Err(GameRepositoryError::NotFound) => {
                    warn!("Event {} references missing game {}", event.id, game_id);
                }
                Err(e) => return Err(EventServiceError::RepositoryError(e.to_string())),
            }
        }
        Ok(games)
    }

    async fn ensure_games_exist(&self, game_ids: &[String]) -> Result<(), EventServiceError> {
        for game_id in game_ids {
            match self.game_repository.get_game(game_id).await {
                Ok(_) => {}
                Err(GameRepositoryError::NotFound) => {
                    return Err(EventServiceError::UnknownGame(game_id.clone()))
                }
                Err(e) => return Err(EventServiceError::RepositoryError(e.to_string())),
            }
        }
        Ok(())
    }
}

fn validate(request: &EventRequest) -> Result<(), EventServiceError> {
    if request.title.trim().is_empty() {
        return Err(EventServiceError::ValidationError(
            "Title cannot be empty".to_string(),
        ));
    }
    Ok(())
}
