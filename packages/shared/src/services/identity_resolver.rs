use std::sync::Arc;
use tracing::debug;

use crate::models::identity::ParticipantIdentity;
use crate::models::user::CurrentUser;
use crate::repositories::participation_repository::ParticipationRepository;
use crate::services::errors::participation_service_errors::ParticipationServiceError;

/// Works out whose participation record a request refers to.
#[derive(Clone)]
pub struct IdentityResolver {
    repository: Arc<dyn ParticipationRepository + Send + Sync>,
}

impl IdentityResolver {
    pub fn new(repository: Arc<dyn ParticipationRepository + Send + Sync>) -> Self {
        IdentityResolver { repository }
    }

    /// A logged-in caller is always their user id. An anonymous caller takes
    /// over the earliest attending guest record of the event, restricted to
    /// `guest_hint` when the client remembers which name it RSVP'd under.
    pub async fn resolve_key(
        &self,
        current_user: Option<&CurrentUser>,
        event_id: &str,
        guest_hint: Option<&str>,
    ) -> Result<Option<ParticipantIdentity>, ParticipationServiceError> {
        if let Some(user) = current_user {
            return Ok(Some(ParticipantIdentity::User {
                id: user.id.clone(),
            }));
        }

        let hint = guest_hint.map(str::trim).filter(|name| !name.is_empty());
        let mut guests: Vec<_> = self
            .repository
            .list_by_event(event_id)
            .await?
            .into_iter()
            .filter(|p| p.attending && p.identity.is_guest())
            .filter(|p| match hint {
                Some(name) => p.identity.guest_name() == Some(name),
                None => true,
            })
            .collect();
        guests.sort_by_key(|p| p.created_at);

        let identity = guests.into_iter().next().map(|p| p.identity);
        debug!(
            "Resolved anonymous caller for event {} to {:?}",
            event_id, identity
        );
        Ok(identity)
    }

    /// Like `resolve_key`, but for changes that cannot proceed without a record
    /// owner.
    pub async fn require_key(
        &self,
        current_user: Option<&CurrentUser>,
        event_id: &str,
        guest_hint: Option<&str>,
    ) -> Result<ParticipantIdentity, ParticipationServiceError> {
        self.resolve_key(current_user, event_id, guest_hint)
            .await?
            .ok_or(ParticipationServiceError::NoParticipantIdentity)
    }

    /// The identity an RSVP is filed under: the user when logged in, otherwise
    /// the name typed into the form.
    pub fn rsvp_identity(
        current_user: Option<&CurrentUser>,
        submitted_name: Option<&str>,
    ) -> Result<ParticipantIdentity, ParticipationServiceError> {
        match current_user {
            Some(user) => Ok(ParticipantIdentity::user(&user.id)?),
            None => Ok(ParticipantIdentity::guest(submitted_name.unwrap_or_default())?),
        }
    }
}
