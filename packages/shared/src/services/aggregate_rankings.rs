use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::game::{ComplexityBand, Game};
use crate::models::identity::ParticipantIdentity;
use crate::models::participation::Participation;
use crate::models::user::User;

/// Per-game summary across every attending participant of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAggregate {
    pub game_id: String,
    pub title: String,
    pub complexity: ComplexityBand,
    pub total_rank: u64,
    pub votes_count: u32,
    pub excluded_count: u32,
    /// Attending participants who did not exclude the game, whether or not they ranked it.
    pub included_count: u32,
    /// `None` when nobody ranked the game.
    pub average_rank: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "rank")]
pub enum ParticipantPreference {
    Ranked(u32),
    Excluded,
    Unranked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantEntry {
    pub display_name: String,
    pub identity: ParticipantIdentity,
    pub preference: ParticipantPreference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameBreakdown {
    pub game_id: String,
    pub title: String,
    pub complexity: ComplexityBand,
    pub participants: Vec<ParticipantEntry>,
}

/// Aggregates rankings and exclusions, lowest average rank first.
///
/// Only attending records that carry rankings or exclusions count; a bare
/// RSVP adds nothing. Games nobody ranked always come last, and
/// games that compare equal keep the order of `event_games`.
pub fn aggregate_rankings(
    event_games: &[Game],
    participations: &[Participation],
) -> Vec<GameAggregate> {
    let attending: Vec<&Participation> = participations
        .iter()
        .filter(|p| p.attending && p.has_preferences())
        .collect();

    let mut aggregates: Vec<GameAggregate> = event_games
        .iter()
        .map(|game| {
            let mut aggregate = GameAggregate {
                game_id: game.id.clone(),
                title: game.title.clone(),
                complexity: game.complexity_band(),
                total_rank: 0,
                votes_count: 0,
                excluded_count: 0,
                included_count: 0,
                average_rank: None,
            };

            for participation in &attending {
                if participation.is_excluded(&game.id) {
                    aggregate.excluded_count += 1;
                } else {
                    aggregate.included_count += 1;
                }
                if let Some(rank) = participation.rank_of(&game.id) {
                    aggregate.total_rank += u64::from(rank);
                    aggregate.votes_count += 1;
                }
            }

            if aggregate.votes_count > 0 {
                aggregate.average_rank =
                    Some(aggregate.total_rank as f64 / f64::from(aggregate.votes_count));
            }
            aggregate
        })
        .collect();

    aggregates.sort_by(compare_aggregates);
    aggregates
}

fn compare_aggregates(a: &GameAggregate, b: &GameAggregate) -> Ordering {
    match (a.average_rank, b.average_rank) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Every attending participant's stance on each event game, for the organizer view.
pub fn participant_breakdown(
    event_games: &[Game],
    participations: &[Participation],
    users: &[User],
) -> Vec<GameBreakdown> {
    let names: HashMap<&str, &str> = users
        .iter()
        .map(|user| (user.id.as_str(), user.name.as_str()))
        .collect();

    let attending: Vec<(&Participation, String)> = participations
        .iter()
        .filter(|p| p.attending)
        .map(|p| (p, display_name(&p.identity, &names)))
        .collect();

    event_games
        .iter()
        .map(|game| GameBreakdown {
            game_id: game.id.clone(),
            title: game.title.clone(),
            complexity: game.complexity_band(),
            participants: attending
                .iter()
                .map(|(participation, name)| ParticipantEntry {
                    display_name: name.clone(),
                    identity: participation.identity.clone(),
                    preference: preference_for(participation, &game.id),
                })
                .collect(),
        })
        .collect()
}

fn preference_for(participation: &Participation, game_id: &str) -> ParticipantPreference {
    if participation.is_excluded(game_id) {
        return ParticipantPreference::Excluded;
    }
    match participation.rank_of(game_id) {
        Some(rank) => ParticipantPreference::Ranked(rank),
        None => ParticipantPreference::Unranked,
    }
}

fn display_name(identity: &ParticipantIdentity, names: &HashMap<&str, &str>) -> String {
    match identity {
        ParticipantIdentity::User { id } => names
            .get(id.as_str())
            .map(|name| name.to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
        ParticipantIdentity::Guest { name } => name.clone(),
    }
}
