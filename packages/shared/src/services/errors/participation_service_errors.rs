use crate::models::identity::IdentityError;
use crate::models::notification::Notification;
use crate::repositories::errors::participation_repository_errors::ParticipationRepositoryError;
use crate::services::errors::event_service_errors::EventServiceError;
use crate::services::preference_list::PreferenceListError;

#[derive(Debug)]
pub enum ParticipationServiceError {
    /// A ranking or exclusion change arrived without anyone to attach it to.
    NoParticipantIdentity,
    /// Storage failed; nothing was written and the call can be retried.
    PersistenceFailure(String),
    RecordNotFound,
    EventNotFound,
    ValidationError(String),
}

impl ParticipationServiceError {
    pub fn notification(&self) -> Notification {
        match self {
            ParticipationServiceError::NoParticipantIdentity => Notification::error(
                "RSVP first",
                "Please RSVP to this event before saving game preferences.",
            ),
            ParticipationServiceError::PersistenceFailure(_) => Notification::error(
                "Save error",
                "Could not save your changes. Please try again.",
            ),
            ParticipationServiceError::RecordNotFound => Notification::error(
                "Not found",
                "Could not find your RSVP record for this event.",
            ),
            ParticipationServiceError::EventNotFound => {
                Notification::error("Not found", "This event no longer exists.")
            }
            ParticipationServiceError::ValidationError(msg) => {
                Notification::error("Invalid request", msg.clone())
            }
        }
    }
}

impl std::fmt::Display for ParticipationServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipationServiceError::NoParticipantIdentity => {
                write!(f, "No participant identity could be resolved")
            }
            ParticipationServiceError::PersistenceFailure(msg) => {
                write!(f, "Persistence failure: {}", msg)
            }
            ParticipationServiceError::RecordNotFound => write!(f, "Participation not found"),
            ParticipationServiceError::EventNotFound => write!(f, "Event not found"),
            ParticipationServiceError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ParticipationServiceError {}

impl From<ParticipationRepositoryError> for ParticipationServiceError {
    fn from(err: ParticipationRepositoryError) -> Self {
        ParticipationServiceError::PersistenceFailure(err.to_string())
    }
}

impl From<IdentityError> for ParticipationServiceError {
    fn from(err: IdentityError) -> Self {
        ParticipationServiceError::ValidationError(err.to_string())
    }
}

impl From<PreferenceListError> for ParticipationServiceError {
    fn from(err: PreferenceListError) -> Self {
        ParticipationServiceError::ValidationError(err.to_string())
    }
}

impl From<EventServiceError> for ParticipationServiceError {
    fn from(err: EventServiceError) -> Self {
        match err {
            EventServiceError::EventNotFound => ParticipationServiceError::EventNotFound,
            EventServiceError::RepositoryError(msg) => {
                ParticipationServiceError::PersistenceFailure(msg)
            }
            other => ParticipationServiceError::ValidationError(other.to_string()),
        }
    }
}
