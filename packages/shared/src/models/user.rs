use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The id comes from the identity provider, so it is not generated here.
    pub fn new(id: String, name: String) -> Self {
        User {
            id,
            name,
            is_admin: false, // organizers are promoted by hand
            created_at: Utc::now(),
        }
    }
}

/// The caller as seen by the core, taken from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
}
