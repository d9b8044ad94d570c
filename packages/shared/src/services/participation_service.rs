use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::event::Event;
use crate::models::identity::ParticipantIdentity;
use crate::models::notification::Notification;
use crate::models::participation::{Participation, Rankings};
use crate::repositories::participation_repository::ParticipationRepository;
use crate::services::errors::participation_service_errors::ParticipationServiceError;
use crate::services::event_service::EventService;
use crate::services::preference_list::{PreferenceGesture, PreferenceList};

/// The stored record after a change, with the message to show the participant.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipationOutcome {
    pub participation: Participation,
    pub notification: Notification,
    /// True when no RSVP existed and one was created to hold the change.
    pub recovered: bool,
}

/// Owns participation records. Every mutation performs at most one full-record
/// write, so a failed call leaves the stored record as it was.
pub struct ParticipationService {
    repository: Arc<dyn ParticipationRepository + Send + Sync>,
    event_service: Arc<EventService>,
}

impl ParticipationService {
    pub fn new(
        repository: Arc<dyn ParticipationRepository + Send + Sync>,
        event_service: Arc<EventService>,
    ) -> Self {
        ParticipationService {
            repository,
            event_service,
        }
    }

    pub async fn upsert_attendance(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
        attending: bool,
    ) -> Result<ParticipationOutcome, ParticipationServiceError> {
        self.load_event(event_id).await?;
        let notification = Notification::attendance(attending, identity.guest_name());

        let participation = match self.repository.get_participation(event_id, identity).await? {
            Some(existing) if existing.attending == attending => {
                debug!("Attendance for {} in event {} unchanged", identity, event_id);
                existing
            }
            Some(mut existing) => {
                existing.attending = attending;
                existing.touch();
                self.repository.put_participation(&existing).await?;
                existing
            }
            None => {
                let created = Participation::new(identity.clone(), event_id, attending);
                self.repository.put_participation(&created).await?;
                created
            }
        };

        info!(
            "Attendance for {} in event {} set to {}",
            identity, event_id, attending
        );
        Ok(ParticipationOutcome {
            participation,
            notification,
            recovered: false,
        })
    }

    /// Replaces the stored rankings wholesale. Exclusions are left untouched.
    pub async fn upsert_rankings(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
        rankings: Rankings,
    ) -> Result<ParticipationOutcome, ParticipationServiceError> {
        if let Some((game_id, _)) = rankings.iter().find(|(_, rank)| **rank == 0) {
            return Err(ParticipationServiceError::ValidationError(format!(
                "Rank for game {} must be at least 1",
                game_id
            )));
        }
        let event = self.load_event(event_id).await?;
        let max_rank = u32::try_from(event.games.len()).unwrap_or(u32::MAX);
        if let Some((game_id, _)) = rankings.iter().find(|(_, rank)| **rank > max_rank) {
            return Err(ParticipationServiceError::ValidationError(format!(
                "Rank for game {} must be between 1 and {}",
                game_id, max_rank
            )));
        }

        let (mut participation, recovered) = self.find_or_create(identity, event_id).await?;
        participation.rankings = Some(rankings);
        participation.touch();
        self.repository.put_participation(&participation).await?;

        Ok(ParticipationOutcome {
            participation,
            notification: Notification::rankings_saved(),
            recovered,
        })
    }

    /// Replaces the stored exclusions wholesale. Rankings are not reconciled
    /// here; callers drop excluded games from their rankings first.
    pub async fn upsert_excluded(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
        excluded: BTreeSet<String>,
    ) -> Result<ParticipationOutcome, ParticipationServiceError> {
        self.load_event(event_id).await?;

        let (mut participation, recovered) = self.find_or_create(identity, event_id).await?;
        participation.excluded = excluded;
        participation.touch();
        self.repository.put_participation(&participation).await?;

        Ok(ParticipationOutcome {
            participation,
            notification: Notification::exclusions_saved(),
            recovered,
        })
    }

    /// Stores the rankings and exclusions of a working list in a single write.
    pub async fn save_preferences(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
        list: &PreferenceList,
    ) -> Result<ParticipationOutcome, ParticipationServiceError> {
        self.load_event(event_id).await?;
        self.store_preferences(identity, event_id, list).await
    }

    async fn store_preferences(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
        list: &PreferenceList,
    ) -> Result<ParticipationOutcome, ParticipationServiceError> {
        let (mut participation, recovered) = self.find_or_create(identity, event_id).await?;
        participation.rankings = Some(list.to_rankings());
        participation.excluded = list.excluded().clone();
        participation.touch();
        self.repository.put_participation(&participation).await?;

        info!(
            "Saved {} ranked and {} excluded games for {} in event {}",
            list.ordered().len(),
            list.excluded().len(),
            identity,
            event_id
        );
        Ok(ParticipationOutcome {
            participation,
            notification: Notification::preferences_saved(),
            recovered,
        })
    }

    /// The working list as it would be shown right now. Without an identity
    /// (or a record) every game is listed in catalog order.
    pub async fn preference_list(
        &self,
        identity: Option<&ParticipantIdentity>,
        event_id: &str,
    ) -> Result<PreferenceList, ParticipationServiceError> {
        let event = self.load_event(event_id).await?;
        let participation = match identity {
            Some(identity) => self.repository.get_participation(event_id, identity).await?,
            None => None,
        };
        Ok(PreferenceList::load(&event.games, participation.as_ref()))
    }

    /// Saves a list the client arranged itself.
    pub async fn save_submission(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
        order: &[String],
        excluded: &[String],
    ) -> Result<ParticipationOutcome, ParticipationServiceError> {
        let event = self.load_event(event_id).await?;
        let list = PreferenceList::from_submission(&event.games, order, excluded)?;
        self.store_preferences(identity, event_id, &list).await
    }

    /// Replays gestures on the stored list and saves the result.
    pub async fn apply_gestures(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
        gestures: &[PreferenceGesture],
    ) -> Result<(PreferenceList, ParticipationOutcome), ParticipationServiceError> {
        let event = self.load_event(event_id).await?;
        let stored = self.repository.get_participation(event_id, identity).await?;
        let mut list = PreferenceList::load(&event.games, stored.as_ref());
        for gesture in gestures {
            if !list.apply(gesture) {
                debug!("Ignored gesture {:?} for {}", gesture, identity);
            }
        }
        let outcome = self.store_preferences(identity, event_id, &list).await?;
        let list = PreferenceList::load(&event.games, Some(&outcome.participation));
        Ok((list, outcome))
    }

    pub async fn get_participation(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
    ) -> Result<Participation, ParticipationServiceError> {
        self.repository
            .get_participation(event_id, identity)
            .await?
            .ok_or(ParticipationServiceError::RecordNotFound)
    }

    pub async fn list_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<Participation>, ParticipationServiceError> {
        let mut participations = self.repository.list_by_event(event_id).await?;
        participations.sort_by_key(|p| p.created_at);
        Ok(participations)
    }

    pub async fn attendees(
        &self,
        event_id: &str,
    ) -> Result<Vec<Participation>, ParticipationServiceError> {
        let mut participations = self.list_for_event(event_id).await?;
        participations.retain(|p| p.attending);
        Ok(participations)
    }

    /// Deletes every record of the event. Safe to call again after a partial
    /// failure; returns how many records were removed.
    pub async fn remove_by_event(&self, event_id: &str) -> Result<usize, ParticipationServiceError> {
        let participations = self.repository.list_by_event(event_id).await?;
        for participation in &participations {
            self.repository
                .delete_participation(event_id, &participation.participant_key)
                .await?;
        }
        info!(
            "Removed {} participations of event {}",
            participations.len(),
            event_id
        );
        Ok(participations.len())
    }

    async fn load_event(&self, event_id: &str) -> Result<Event, ParticipationServiceError> {
        Ok(self.event_service.get_event(event_id).await?)
    }

    async fn find_or_create(
        &self,
        identity: &ParticipantIdentity,
        event_id: &str,
    ) -> Result<(Participation, bool), ParticipationServiceError> {
        match self.repository.get_participation(event_id, identity).await? {
            Some(participation) => Ok((participation, false)),
            None => {
                warn!(
                    "No RSVP found for {} in event {}; recording them as attending",
                    identity, event_id
                );
                Ok((Participation::new(identity.clone(), event_id, true), true))
            }
        }
    }
}
