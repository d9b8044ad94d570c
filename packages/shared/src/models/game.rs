use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A boardgame in the shared catalog.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Game {
    pub id: String,
    pub title: String,
    pub description: String,
    pub complexity_rating: Option<f64>, // BGG weight, 1-5
    pub video_url: Option<String>,
    pub bgg_url: Option<String>,
    pub image_url: Option<String>,
}

/// Payload for creating a game or replacing its editable fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub complexity_rating: Option<f64>,
    pub video_url: Option<String>,
    pub bgg_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum ComplexityBand {
    Light,
    MediumLight,
    Medium,
    MediumHeavy,
    Heavy,
}

impl ComplexityBand {
    pub fn from_rating(rating: Option<f64>) -> Self {
        match rating {
            None => ComplexityBand::Light,
            Some(r) if r <= 1.5 => ComplexityBand::Light,
            Some(r) if r <= 2.5 => ComplexityBand::MediumLight,
            Some(r) if r <= 3.5 => ComplexityBand::Medium,
            Some(r) if r <= 4.5 => ComplexityBand::MediumHeavy,
            Some(_) => ComplexityBand::Heavy,
        }
    }
}

impl Game {
    pub fn new(request: GameRequest) -> Self {
        Game {
            id: Uuid::new_v4().to_string(),
            title: request.title,
            description: request.description,
            complexity_rating: request.complexity_rating,
            video_url: request.video_url,
            bgg_url: request.bgg_url,
            image_url: request.image_url,
        }
    }

    pub fn apply(&mut self, request: GameRequest) {
        self.title = request.title;
        self.description = request.description;
        self.complexity_rating = request.complexity_rating;
        self.video_url = request.video_url;
        self.bgg_url = request.bgg_url;
        self.image_url = request.image_url;
    }

    pub fn complexity_band(&self) -> ComplexityBand {
        ComplexityBand::from_rating(self.complexity_rating)
    }
}
