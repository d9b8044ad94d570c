use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::models::participation::{Participation, Rankings};

/// A single edit a participant makes to their working list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreferenceGesture {
    MoveUp { index: usize },
    MoveDown { index: usize },
    ToggleExcluded { game_id: String },
}

#[derive(Debug, PartialEq, Eq)]
pub enum PreferenceListError {
    UnknownGame(String),
    DuplicateGame(String),
    RankedAndExcluded(String),
}

impl fmt::Display for PreferenceListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceListError::UnknownGame(id) => {
                write!(f, "Game {} is not part of this event", id)
            }
            PreferenceListError::DuplicateGame(id) => {
                write!(f, "Game {} appears more than once", id)
            }
            PreferenceListError::RankedAndExcluded(id) => {
                write!(f, "Game {} cannot be both ranked and excluded", id)
            }
        }
    }
}

impl std::error::Error for PreferenceListError {}

/// One row of the ranked list as the client renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceEntry {
    pub game_id: String,
    /// 1-based position in the working list; becomes the rank on save.
    pub position: u32,
    /// Rank currently persisted for the game, `None` when it has never been ranked.
    pub stored_rank: Option<u32>,
}

/// The ordered working list of games a participant is arranging for one event.
///
/// `ordered` and `excluded` never share a game id, and both only ever hold ids
/// of the event's games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceList {
    event_games: Vec<String>,
    ordered: Vec<String>,
    excluded: BTreeSet<String>,
    stored: Rankings,
}

impl PreferenceList {
    /// Builds the working list from what is persisted.
    ///
    /// Included games are sorted by stored rank; games without a rank follow all
    /// ranked ones. The sort is stable, so unranked games (and any tied ranks)
    /// keep the event's catalog order.
    pub fn load(event_games: &[String], participation: Option<&Participation>) -> Self {
        let Some(participation) = participation else {
            return PreferenceList {
                event_games: event_games.to_vec(),
                ordered: event_games.to_vec(),
                excluded: BTreeSet::new(),
                stored: Rankings::new(),
            };
        };

        let (excluded, mut included): (Vec<String>, Vec<String>) = event_games
            .iter()
            .cloned()
            .partition(|game| participation.is_excluded(game));

        included.sort_by_key(|game| match participation.rank_of(game) {
            Some(rank) => (0, rank),
            None => (1, 0),
        });

        let stored = participation
            .rankings
            .as_ref()
            .map(|rankings| {
                rankings
                    .iter()
                    .filter(|(game, _)| event_games.contains(*game))
                    .map(|(game, rank)| (game.clone(), *rank))
                    .collect()
            })
            .unwrap_or_default();

        PreferenceList {
            event_games: event_games.to_vec(),
            ordered: included,
            excluded: excluded.into_iter().collect(),
            stored,
        }
    }

    /// Builds the list a client arranged on its own. Every id must belong to the
    /// event and may appear only once across `order` and `excluded`.
    pub fn from_submission(
        event_games: &[String],
        order: &[String],
        excluded: &[String],
    ) -> Result<Self, PreferenceListError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for game in order {
            if !event_games.contains(game) {
                return Err(PreferenceListError::UnknownGame(game.clone()));
            }
            if !seen.insert(game.as_str()) {
                return Err(PreferenceListError::DuplicateGame(game.clone()));
            }
        }

        let mut excluded_set = BTreeSet::new();
        for game in excluded {
            if !event_games.contains(game) {
                return Err(PreferenceListError::UnknownGame(game.clone()));
            }
            if seen.contains(game.as_str()) {
                return Err(PreferenceListError::RankedAndExcluded(game.clone()));
            }
            excluded_set.insert(game.clone());
        }

        Ok(PreferenceList {
            event_games: event_games.to_vec(),
            ordered: order.to_vec(),
            excluded: excluded_set,
            stored: Rankings::new(),
        })
    }

    pub fn ordered(&self) -> &[String] {
        &self.ordered
    }

    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Excluded games in catalog order.
    pub fn excluded_games(&self) -> Vec<String> {
        self.event_games
            .iter()
            .filter(|game| self.excluded.contains(game.as_str()))
            .cloned()
            .collect()
    }

    pub fn entries(&self) -> Vec<PreferenceEntry> {
        self.ordered
            .iter()
            .enumerate()
            .map(|(index, game)| PreferenceEntry {
                game_id: game.clone(),
                position: index as u32 + 1,
                stored_rank: self.stored.get(game).copied(),
            })
            .collect()
    }

    /// Swaps the game at `index` with the one above it. Returns false when there
    /// is nothing to swap with.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.ordered.len() {
            return false;
        }
        self.ordered.swap(index - 1, index);
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.ordered.len().saturating_sub(1) {
            return false;
        }
        self.ordered.swap(index, index + 1);
        true
    }

    /// Excluding drops the game from the working list. Including it again
    /// appends it to the end, whatever rank it held before.
    pub fn toggle_excluded(&mut self, game_id: &str) -> bool {
        if !self.event_games.iter().any(|game| game == game_id) {
            return false;
        }

        if self.excluded.remove(game_id) {
            self.ordered.push(game_id.to_string());
        } else {
            self.ordered.retain(|game| game != game_id);
            self.excluded.insert(game_id.to_string());
        }
        true
    }

    pub fn apply(&mut self, gesture: &PreferenceGesture) -> bool {
        match gesture {
            PreferenceGesture::MoveUp { index } => self.move_up(*index),
            PreferenceGesture::MoveDown { index } => self.move_down(*index),
            PreferenceGesture::ToggleExcluded { game_id } => self.toggle_excluded(game_id),
        }
    }

    /// Ranks by position: the first game gets 1. Earlier ranks are not consulted.
    pub fn to_rankings(&self) -> Rankings {
        self.ordered
            .iter()
            .enumerate()
            .map(|(index, game)| (game.clone(), index as u32 + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::ParticipantIdentity;
    use proptest::prelude::*;

    fn games(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|g| g.to_string()).collect()
    }

    fn participation(rankings: Option<&[(&str, u32)]>, excluded: &[&str]) -> Participation {
        let mut participation =
            Participation::new(ParticipantIdentity::guest("Alex").unwrap(), "event-1", true);
        participation.rankings = rankings.map(|pairs| {
            pairs
                .iter()
                .map(|(game, rank)| (game.to_string(), *rank))
                .collect()
        });
        participation.excluded = excluded.iter().map(|g| g.to_string()).collect();
        participation
    }

    #[test]
    fn test_load_without_participation_lists_every_game() {
        let list = PreferenceList::load(&games(&["a", "b", "c"]), None);
        assert_eq!(list.ordered(), games(&["a", "b", "c"]).as_slice());
        assert!(list.excluded().is_empty());
    }

    #[test]
    fn test_load_sorts_by_rank_and_puts_unranked_last_in_catalog_order() {
        let stored = participation(Some(&[("d", 1), ("b", 2)]), &["c"]);
        let list = PreferenceList::load(&games(&["a", "b", "c", "d", "e"]), Some(&stored));

        assert_eq!(list.ordered(), games(&["d", "b", "a", "e"]).as_slice());
        assert_eq!(list.excluded_games(), games(&["c"]));
    }

    #[test]
    fn test_load_keeps_catalog_order_for_tied_ranks() {
        let stored = participation(Some(&[("c", 1), ("a", 1)]), &[]);
        let list = PreferenceList::load(&games(&["a", "b", "c"]), Some(&stored));
        assert_eq!(list.ordered(), games(&["a", "c", "b"]).as_slice());
    }

    #[test]
    fn test_load_ignores_exclusions_outside_the_event() {
        let stored = participation(None, &["gone"]);
        let list = PreferenceList::load(&games(&["a"]), Some(&stored));
        assert!(list.excluded().is_empty());
        assert_eq!(list.ordered(), games(&["a"]).as_slice());
    }

    #[test]
    fn test_load_twice_gives_identical_lists() {
        let stored = participation(Some(&[("b", 1)]), &["a"]);
        let catalog = games(&["a", "b", "c", "d"]);
        let first = PreferenceList::load(&catalog, Some(&stored));
        let second = PreferenceList::load(&catalog, Some(&stored));
        assert_eq!(first, second);
    }

    #[test]
    fn test_entries_show_stored_ranks_and_unranked_games() {
        let stored = participation(Some(&[("b", 1)]), &[]);
        let list = PreferenceList::load(&games(&["a", "b"]), Some(&stored));

        let entries = list.entries();
        assert_eq!(entries[0].game_id, "b");
        assert_eq!(entries[0].stored_rank, Some(1));
        assert_eq!(entries[1].game_id, "a");
        assert_eq!(entries[1].position, 2);
        assert_eq!(entries[1].stored_rank, None);
    }

    #[test]
    fn test_moves_out_of_bounds_are_no_ops() {
        let mut list = PreferenceList::load(&games(&["a", "b"]), None);

        assert!(!list.move_up(0));
        assert!(!list.move_down(1));
        assert!(!list.move_up(5));
        assert!(!list.move_down(5));
        assert_eq!(list.ordered(), games(&["a", "b"]).as_slice());

        assert!(list.move_down(0));
        assert_eq!(list.ordered(), games(&["b", "a"]).as_slice());
        assert!(list.move_up(1));
        assert_eq!(list.ordered(), games(&["a", "b"]).as_slice());
    }

    #[test]
    fn test_huge_gesture_index_is_a_no_op() {
        let mut list = PreferenceList::load(&games(&["a", "b", "c"]), None);
        let gesture: PreferenceGesture =
            serde_json::from_str(r#"{"type":"move_down","index":18446744073709551615}"#).unwrap();

        assert!(!list.apply(&gesture));
        assert!(!list.move_up(usize::MAX));
        assert!(!list.move_down(usize::MAX - 1));
        assert_eq!(list.ordered(), games(&["a", "b", "c"]).as_slice());

        let mut empty = PreferenceList::load(&[], None);
        assert!(!empty.move_down(0));
        assert!(!empty.move_up(0));
    }

    #[test]
    fn test_reincluded_game_goes_to_the_end_and_loses_its_rank() {
        let stored = participation(Some(&[("a", 1), ("b", 2), ("c", 3)]), &[]);
        let mut list = PreferenceList::load(&games(&["a", "b", "c"]), Some(&stored));

        assert!(list.toggle_excluded("a"));
        assert_eq!(list.ordered(), games(&["b", "c"]).as_slice());
        assert!(list.excluded().contains("a"));

        assert!(list.toggle_excluded("a"));
        assert_eq!(list.ordered(), games(&["b", "c", "a"]).as_slice());
        assert_eq!(list.to_rankings().get("a"), Some(&3));
    }

    #[test]
    fn test_toggle_unknown_game_is_ignored() {
        let mut list = PreferenceList::load(&games(&["a"]), None);
        assert!(!list.toggle_excluded("zzz"));
        assert!(list.excluded().is_empty());
    }

    #[test]
    fn test_apply_dispatches_gestures() {
        let mut list = PreferenceList::load(&games(&["a", "b", "c"]), None);
        assert!(list.apply(&PreferenceGesture::MoveDown { index: 0 }));
        assert!(list.apply(&PreferenceGesture::ToggleExcluded {
            game_id: "c".to_string()
        }));
        assert_eq!(list.ordered(), games(&["b", "a"]).as_slice());
    }

    #[test]
    fn test_gesture_json_shape() {
        let gesture: PreferenceGesture =
            serde_json::from_str(r#"{"type":"toggle_excluded","game_id":"a"}"#).unwrap();
        assert_eq!(
            gesture,
            PreferenceGesture::ToggleExcluded {
                game_id: "a".to_string()
            }
        );
    }

    #[test]
    fn test_to_rankings_replaces_previous_ranks() {
        let stored = participation(Some(&[("a", 7), ("b", 9)]), &[]);
        let mut list = PreferenceList::load(&games(&["a", "b"]), Some(&stored));
        list.move_down(0);

        let rankings = list.to_rankings();
        assert_eq!(rankings.get("b"), Some(&1));
        assert_eq!(rankings.get("a"), Some(&2));
    }

    #[test]
    fn test_from_submission_validation() {
        let catalog = games(&["a", "b", "c"]);

        assert_eq!(
            PreferenceList::from_submission(&catalog, &games(&["a", "x"]), &[]),
            Err(PreferenceListError::UnknownGame("x".to_string()))
        );
        assert_eq!(
            PreferenceList::from_submission(&catalog, &games(&["a", "a"]), &[]),
            Err(PreferenceListError::DuplicateGame("a".to_string()))
        );
        assert_eq!(
            PreferenceList::from_submission(&catalog, &games(&["a"]), &games(&["a"])),
            Err(PreferenceListError::RankedAndExcluded("a".to_string()))
        );

        let list =
            PreferenceList::from_submission(&catalog, &games(&["c", "a"]), &games(&["b"]))
                .unwrap();
        assert_eq!(list.to_rankings().get("c"), Some(&1));
        assert!(list.excluded().contains("b"));
    }

    proptest! {
        #[test]
        fn prop_save_ranks_are_one_to_n_and_disjoint_from_exclusions(
            game_count in 1usize..8,
            gestures in prop::collection::vec((0u8..3, 0usize..10), 0..40),
        ) {
            let catalog: Vec<String> = (0..game_count).map(|i| format!("g{}", i)).collect();
            let mut list = PreferenceList::load(&catalog, None);

            for (kind, value) in gestures {
                let gesture = match kind {
                    0 => PreferenceGesture::MoveUp { index: value },
                    1 => PreferenceGesture::MoveDown { index: value },
                    _ => PreferenceGesture::ToggleExcluded {
                        game_id: format!("g{}", value % game_count),
                    },
                };
                list.apply(&gesture);
            }

            let rankings = list.to_rankings();
            let mut ranks: Vec<u32> = rankings.values().copied().collect();
            ranks.sort_unstable();
            let expected: Vec<u32> = (1..=list.ordered().len() as u32).collect();
            prop_assert_eq!(ranks, expected);

            for game in list.excluded() {
                prop_assert!(!rankings.contains_key(game));
            }
            prop_assert_eq!(rankings.len() + list.excluded().len(), game_count);
        }
    }
}
