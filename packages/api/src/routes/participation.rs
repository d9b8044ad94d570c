use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use lambda_http::tracing::{debug, error};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::{
    error::ApiError,
    middleware::auth::{GuestHint, OptionalUser},
    state::AppState,
};
use shared::models::identity::ParticipantIdentity;
use shared::models::notification::Notification;
use shared::models::participation::{Participation, RankingState};
use shared::models::requests::{
    ExclusionsRequest, GesturesRequest, PreferencesRequest, RankingsRequest, RsvpRequest,
};
use shared::services::identity_resolver::IdentityResolver;
use shared::services::participation_service::ParticipationOutcome;
use shared::services::preference_list::{PreferenceEntry, PreferenceList};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{event_id}/rsvp", post(rsvp))
        .route("/events/{event_id}/attendees", get(attendees))
        .route("/events/{event_id}/participation", get(own_participation))
        .route(
            "/events/{event_id}/preferences",
            get(get_preferences).put(put_preferences),
        )
        .route("/events/{event_id}/preferences/gestures", post(gestures))
        .route("/events/{event_id}/rankings", put(put_rankings))
        .route("/events/{event_id}/exclusions", put(put_exclusions))
}

#[derive(Debug, Serialize)]
pub struct Attendee {
    pub display_name: String,
    pub identity: ParticipantIdentity,
}

#[derive(Debug, Serialize)]
pub struct ParticipationView {
    pub participation: Participation,
    pub ranking_state: RankingState,
}

/// The working list as the client renders it.
#[derive(Debug, Serialize)]
pub struct PreferencesView {
    pub identity: Option<ParticipantIdentity>,
    pub entries: Vec<PreferenceEntry>,
    pub excluded: Vec<String>,
}

impl PreferencesView {
    fn new(identity: Option<ParticipantIdentity>, list: &PreferenceList) -> Self {
        PreferencesView {
            identity,
            entries: list.entries(),
            excluded: list.excluded_games(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GesturesResponse {
    pub preferences: PreferencesView,
    pub notification: Notification,
    pub recovered: bool,
}

async fn rsvp(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(event_id): Path<String>,
    Json(request): Json<RsvpRequest>,
) -> Result<Json<ParticipationOutcome>, ApiError> {
    let identity = IdentityResolver::rsvp_identity(user.as_ref(), request.name.as_deref())?;
    state
        .participation_service
        .upsert_attendance(&identity, &event_id, request.attending)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to RSVP {} to event {}: {}", identity, event_id, e);
            ApiError::from(e)
        })
}

async fn attendees(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<Attendee>>, ApiError> {
    let participations = state.participation_service.attendees(&event_id).await?;

    let needs_names = participations.iter().any(|p| !p.identity.is_guest());
    let users = if needs_names {
        state.user_service.list_users().await?
    } else {
        Vec::new()
    };
    let names: HashMap<&str, &str> = users
        .iter()
        .map(|user| (user.id.as_str(), user.name.as_str()))
        .collect();

    let attendees = participations
        .into_iter()
        .map(|p| {
            let display_name = match &p.identity {
                ParticipantIdentity::User { id } => {
                    names.get(id.as_str()).unwrap_or(&"Unknown").to_string()
                }
                ParticipantIdentity::Guest { name } => name.clone(),
            };
            Attendee {
                display_name,
                identity: p.identity,
            }
        })
        .collect();
    Ok(Json(attendees))
}

async fn own_participation(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    GuestHint(hint): GuestHint,
    Path(event_id): Path<String>,
) -> Result<Json<ParticipationView>, ApiError> {
    let identity = state
        .identity_resolver
        .require_key(user.as_ref(), &event_id, hint.as_deref())
        .await?;
    let event = state.event_service.get_event(&event_id).await?;
    let participation = state
        .participation_service
        .get_participation(&identity, &event_id)
        .await?;
    Ok(Json(ParticipationView {
        ranking_state: participation.ranking_state(&event.games),
        participation,
    }))
}

async fn get_preferences(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    GuestHint(hint): GuestHint,
    Path(event_id): Path<String>,
) -> Result<Json<PreferencesView>, ApiError> {
    let identity = state
        .identity_resolver
        .resolve_key(user.as_ref(), &event_id, hint.as_deref())
        .await?;
    let list = state
        .participation_service
        .preference_list(identity.as_ref(), &event_id)
        .await?;
    Ok(Json(PreferencesView::new(identity, &list)))
}

async fn put_preferences(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    GuestHint(hint): GuestHint,
    Path(event_id): Path<String>,
    Json(request): Json<PreferencesRequest>,
) -> Result<Json<ParticipationOutcome>, ApiError> {
    let identity = state
        .identity_resolver
        .require_key(user.as_ref(), &event_id, hint.as_deref())
        .await?;
    state
        .participation_service
        .save_submission(&identity, &event_id, &request.order, &request.excluded)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to save preferences of {} for event {}: {}",
                identity, event_id, e
            );
            ApiError::from(e)
        })
}

async fn gestures(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    GuestHint(hint): GuestHint,
    Path(event_id): Path<String>,
    Json(request): Json<GesturesRequest>,
) -> Result<Json<GesturesResponse>, ApiError> {
    let identity = state
        .identity_resolver
        .require_key(user.as_ref(), &event_id, hint.as_deref())
        .await?;
    let (list, outcome) = state
        .participation_service
        .apply_gestures(&identity, &event_id, &request.gestures)
        .await
        .map_err(|e| {
            error!(
                "Failed to apply gestures of {} for event {}: {}",
                identity, event_id, e
            );
            ApiError::from(e)
        })?;
    debug!(
        "Applied {} gestures for {} in event {}",
        request.gestures.len(),
        identity,
        event_id
    );
    Ok(Json(GesturesResponse {
        preferences: PreferencesView::new(Some(identity), &list),
        notification: outcome.notification,
        recovered: outcome.recovered,
    }))
}

async fn put_rankings(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    GuestHint(hint): GuestHint,
    Path(event_id): Path<String>,
    Json(request): Json<RankingsRequest>,
) -> Result<Json<ParticipationOutcome>, ApiError> {
    let identity = state
        .identity_resolver
        .require_key(user.as_ref(), &event_id, hint.as_deref())
        .await?;
    state
        .participation_service
        .upsert_rankings(&identity, &event_id, request.rankings)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to save rankings of {} for event {}: {}",
                identity, event_id, e
            );
            ApiError::from(e)
        })
}

async fn put_exclusions(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    GuestHint(hint): GuestHint,
    Path(event_id): Path<String>,
    Json(request): Json<ExclusionsRequest>,
) -> Result<Json<ParticipationOutcome>, ApiError> {
    let identity = state
        .identity_resolver
        .require_key(user.as_ref(), &event_id, hint.as_deref())
        .await?;
    let excluded: BTreeSet<String> = request.excluded.into_iter().collect();
    state
        .participation_service
        .upsert_excluded(&identity, &event_id, excluded)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to save exclusions of {} for event {}: {}",
                identity, event_id, e
            );
            ApiError::from(e)
        })
}
