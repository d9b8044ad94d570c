use crate::repositories::errors::event_repository_errors::EventRepositoryError;

#[derive(Debug)]
pub enum EventServiceError {
    EventNotFound,
    UnknownGame(String),
    ValidationError(String),
    RepositoryError(String),
}

impl std::fmt::Display for EventServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventServiceError::EventNotFound => write!(f, "Event not found"),
            EventServiceError::UnknownGame(id) => write!(f, "Unknown game: {}", id),
            EventServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            EventServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for EventServiceError {}

impl From<EventRepositoryError> for EventServiceError {
    fn from(err: EventRepositoryError) -> Self {
        match err {
            EventRepositoryError::NotFound => EventServiceError::EventNotFound,
            other => EventServiceError::RepositoryError(other.to_string()),
        }
    }
}
