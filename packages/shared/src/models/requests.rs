use serde::{Deserialize, Serialize};

use crate::models::participation::Rankings;
use crate::services::preference_list::PreferenceGesture;

#[derive(Debug, Deserialize, Serialize)]
pub struct RsvpRequest {
    /// Ignored for logged-in callers.
    #[serde(default)]
    pub name: Option<String>,
    pub attending: bool,
}

/// A whole list arranged by the client: `order` is ranked top to bottom.
#[derive(Debug, Deserialize, Serialize)]
pub struct PreferencesRequest {
    pub order: Vec<String>,
    #[serde(default)]
    pub excluded: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GesturesRequest {
    pub gestures: Vec<PreferenceGesture>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RankingsRequest {
    pub rankings: Rankings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExclusionsRequest {
    pub excluded: Vec<String>,
}
