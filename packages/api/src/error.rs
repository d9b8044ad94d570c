use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::models::notification::Notification;
use shared::services::errors::{
    auth_service_errors::AuthServiceError, event_service_errors::EventServiceError,
    game_service_errors::GameServiceError,
    participation_service_errors::ParticipationServiceError,
    user_service_errors::UserServiceError,
};

#[derive(Debug)]
pub enum ApiError {
    UserService(UserServiceError),
    AuthService(AuthServiceError),
    GameService(GameServiceError),
    EventService(EventServiceError),
    ParticipationService(ParticipationServiceError),
    Unauthorized,
    Forbidden,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub notification: Notification,
}

impl From<UserServiceError> for ApiError {
    fn from(error: UserServiceError) -> Self {
        ApiError::UserService(error)
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        ApiError::AuthService(error)
    }
}

impl From<GameServiceError> for ApiError {
    fn from(error: GameServiceError) -> Self {
        ApiError::GameService(error)
    }
}

impl From<EventServiceError> for ApiError {
    fn from(error: EventServiceError) -> Self {
        ApiError::EventService(error)
    }
}

impl From<ParticipationServiceError> for ApiError {
    fn from(error: ParticipationServiceError) -> Self {
        ApiError::ParticipationService(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UserService(UserServiceError::UserNotFound) => StatusCode::NOT_FOUND,
            ApiError::UserService(UserServiceError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            ApiError::UserService(UserServiceError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::AuthService(AuthServiceError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            ApiError::AuthService(AuthServiceError::JwtError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::AuthService(
                AuthServiceError::MissingToken
                | AuthServiceError::InvalidToken
                | AuthServiceError::ExpiredToken,
            ) => StatusCode::UNAUTHORIZED,

            ApiError::GameService(GameServiceError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::GameService(GameServiceError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            ApiError::GameService(GameServiceError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::EventService(EventServiceError::EventNotFound) => StatusCode::NOT_FOUND,
            ApiError::EventService(
                EventServiceError::UnknownGame(_) | EventServiceError::ValidationError(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::EventService(EventServiceError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::ParticipationService(e) => match e {
                ParticipationServiceError::NoParticipantIdentity
                | ParticipationServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                ParticipationServiceError::RecordNotFound
                | ParticipationServiceError::EventNotFound => StatusCode::NOT_FOUND,
                // retryable: nothing was written
                ParticipationServiceError::PersistenceFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            },

            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    fn notification(&self) -> Notification {
        match self {
            ApiError::ParticipationService(e) => e.notification(),
            ApiError::Unauthorized | ApiError::AuthService(_) => {
                Notification::error("Sign in required", "Please sign in and try again.")
            }
            ApiError::Forbidden => Notification::error(
                "Not allowed",
                "Only organizers can do that.",
            ),
            ApiError::GameService(GameServiceError::GameNotFound) => {
                Notification::error("Not found", "This game no longer exists.")
            }
            ApiError::EventService(EventServiceError::EventNotFound) => {
                Notification::error("Not found", "This event no longer exists.")
            }
            other => match other.status() {
                StatusCode::BAD_REQUEST => Notification::error("Invalid request", other.message()),
                _ => Notification::error("Error", "Something went wrong. Please try again."),
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::UserService(e) => e.to_string(),
            ApiError::AuthService(e) => e.to_string(),
            ApiError::GameService(e) => e.to_string(),
            ApiError::EventService(e) => e.to_string(),
            ApiError::ParticipationService(e) => e.to_string(),
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::Forbidden => "Forbidden".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
            notification: self.notification(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participation_errors_map_to_status() {
        let cases = [
            (
                ParticipationServiceError::NoParticipantIdentity,
                StatusCode::BAD_REQUEST,
            ),
            (
                ParticipationServiceError::PersistenceFailure("throttled".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ParticipationServiceError::RecordNotFound,
                StatusCode::NOT_FOUND,
            ),
            (
                ParticipationServiceError::ValidationError("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_validation_message_reaches_the_notification() {
        let error = ApiError::from(EventServiceError::UnknownGame("g9".to_string()));
        let notification = error.notification();
        assert_eq!(notification.title, "Invalid request");
        assert!(notification.message.contains("g9"));
    }

    #[test]
    fn test_storage_details_are_not_shown_to_users() {
        let error = ApiError::from(GameServiceError::RepositoryError("table xyz".to_string()));
        assert!(!error.notification().message.contains("xyz"));
    }
}
