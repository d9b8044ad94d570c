use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled game night and the games on offer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    /// Game ids; the order is the catalog order shown to attendees.
    pub games: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub games: Vec<String>,
}

impl Event {
    pub fn new(request: EventRequest) -> Self {
        Event {
            id: Uuid::new_v4().to_string(),
            title: request.title,
            description: request.description,
            date: request.date,
            games: dedup_games(request.games),
        }
    }

    pub fn apply(&mut self, request: EventRequest) {
        self.title = request.title;
        self.description = request.description;
        self.date = request.date;
        self.games = dedup_games(request.games);
    }

    pub fn has_game(&self, game_id: &str) -> bool {
        self.games.iter().any(|g| g == game_id)
    }

    /// Returns whether the game was on the event.
    pub fn remove_game(&mut self, game_id: &str) -> bool {
        let before = self.games.len();
        self.games.retain(|g| g != game_id);
        self.games.len() != before
    }
}

fn dedup_games(games: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(games.len());
    for game in games {
        if !unique.contains(&game) {
            unique.push(game);
        }
    }
    unique
}
