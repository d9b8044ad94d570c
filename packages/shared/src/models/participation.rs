use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::identity::ParticipantIdentity;

/// Game id -> rank, 1 being the most wanted.
pub type Rankings = BTreeMap<String, u32>;

/// One participant's attendance and game preferences for one event.
///
/// Stored in the participations table, partitioned by `event_id` with
/// `participant_key` as sort key, so an (event, identity) pair maps to exactly
/// one item.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Participation {
    pub event_id: String,
    pub participant_key: String,
    pub identity: ParticipantIdentity,
    pub attending: bool,
    /// `None` until the participant saves a ranking for the first time.
    pub rankings: Option<Rankings>,
    #[serde(default)]
    pub excluded: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RankingState {
    Unranked,
    PartiallyRanked,
    FullyRanked,
}

impl Participation {
    pub fn new(identity: ParticipantIdentity, event_id: &str, attending: bool) -> Self {
        let now = Utc::now();
        Participation {
            event_id: event_id.to_string(),
            participant_key: identity.storage_key(),
            identity,
            attending,
            rankings: None,
            excluded: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rank_of(&self, game_id: &str) -> Option<u32> {
        self.rankings
            .as_ref()
            .and_then(|rankings| rankings.get(game_id).copied())
    }

    pub fn is_excluded(&self, game_id: &str) -> bool {
        self.excluded.contains(game_id)
    }

    pub fn has_preferences(&self) -> bool {
        self.rankings.is_some() || !self.excluded.is_empty()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Where this participant stands on ranking the given event games.
    pub fn ranking_state(&self, event_games: &[String]) -> RankingState {
        let Some(rankings) = &self.rankings else {
            return RankingState::Unranked;
        };

        let candidates: Vec<&String> = event_games
            .iter()
            .filter(|game| !self.excluded.contains(game.as_str()))
            .collect();

        let mut ranks: Vec<u32> = Vec::with_capacity(candidates.len());
        for game in &candidates {
            match rankings.get(game.as_str()) {
                Some(rank) => ranks.push(*rank),
                None => return RankingState::PartiallyRanked,
            }
        }

        ranks.sort_unstable();
        let complete = ranks
            .iter()
            .enumerate()
            .all(|(index, rank)| *rank as usize == index + 1);
        if complete {
            RankingState::FullyRanked
        } else {
            RankingState::PartiallyRanked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|g| g.to_string()).collect()
    }

    fn participation() -> Participation {
        Participation::new(ParticipantIdentity::guest("Alex").unwrap(), "event-1", true)
    }

    #[test]
    fn test_new_participation_has_no_preferences() {
        let participation = participation();
        assert_eq!(participation.participant_key, "GUEST#Alex");
        assert!(participation.rankings.is_none());
        assert!(participation.excluded.is_empty());
        assert!(!participation.has_preferences());
        assert_eq!(participation.created_at, participation.updated_at);
    }

    #[test]
    fn test_ranking_state_unranked_without_rankings_object() {
        let participation = participation();
        assert_eq!(
            participation.ranking_state(&games(&["a", "b"])),
            RankingState::Unranked
        );
    }

    #[test]
    fn test_ranking_state_partial_when_a_game_is_missing() {
        let mut participation = participation();
        participation.rankings = Some(Rankings::from([("a".to_string(), 1)]));
        assert_eq!(
            participation.ranking_state(&games(&["a", "b"])),
            RankingState::PartiallyRanked
        );
    }

    #[test]
    fn test_ranking_state_partial_with_tied_ranks() {
        let mut participation = participation();
        participation.rankings = Some(Rankings::from([
            ("a".to_string(), 1),
            ("b".to_string(), 1),
        ]));
        assert_eq!(
            participation.ranking_state(&games(&["a", "b"])),
            RankingState::PartiallyRanked
        );
    }

    #[test]
    fn test_ranking_state_full_ignores_excluded_games() {
        let mut participation = participation();
        participation.rankings = Some(Rankings::from([
            ("a".to_string(), 2),
            ("c".to_string(), 1),
        ]));
        participation.excluded.insert("b".to_string());
        assert_eq!(
            participation.ranking_state(&games(&["a", "b", "c"])),
            RankingState::FullyRanked
        );
    }

    #[test]
    fn test_ranking_state_full_when_everything_excluded() {
        let mut participation = participation();
        participation.rankings = Some(Rankings::new());
        participation.excluded.insert("a".to_string());
        assert_eq!(
            participation.ranking_state(&games(&["a"])),
            RankingState::FullyRanked
        );
    }

    #[test]
    fn test_participation_serialization() {
        let mut participation = participation();
        participation.rankings = Some(Rankings::from([("a".to_string(), 1)]));

        let serialized = serde_json::to_string(&participation).unwrap();
        assert!(serialized.contains("\"participant_key\":\"GUEST#Alex\""));

        let deserialized: Participation = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, participation);
    }
}
