use serde::{Deserialize, Serialize};
use std::fmt;

const USER_KEY_PREFIX: &str = "USER#";
const GUEST_KEY_PREFIX: &str = "GUEST#";

/// Who a participation record belongs to.
///
/// Built once at the request boundary (from the verified token or the submitted
/// RSVP name) and passed through the core unchanged. The kind is never guessed
/// from the shape of the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum ParticipantIdentity {
    User { id: String },
    Guest { name: String },
}

#[derive(Debug, PartialEq, Eq)]
pub enum IdentityError {
    EmptyUserId,
    EmptyGuestName,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::EmptyUserId => write!(f, "User ID cannot be empty"),
            IdentityError::EmptyGuestName => write!(f, "Please enter your name to RSVP"),
        }
    }
}

impl std::error::Error for IdentityError {}

impl ParticipantIdentity {
    pub fn user(id: &str) -> Result<Self, IdentityError> {
        if id.is_empty() {
            return Err(IdentityError::EmptyUserId);
        }
        Ok(ParticipantIdentity::User { id: id.to_string() })
    }

    /// Surrounding whitespace is dropped; after that the name is matched exactly.
    pub fn guest(name: &str) -> Result<Self, IdentityError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyGuestName);
        }
        Ok(ParticipantIdentity::Guest {
            name: name.to_string(),
        })
    }

    /// Sort key of the participation item. The prefixes keep a guest called
    /// "u123" apart from the user whose id is "u123".
    pub fn storage_key(&self) -> String {
        match self {
            ParticipantIdentity::User { id } => format!("{}{}", USER_KEY_PREFIX, id),
            ParticipantIdentity::Guest { name } => format!("{}{}", GUEST_KEY_PREFIX, name),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, ParticipantIdentity::Guest { .. })
    }

    pub fn guest_name(&self) -> Option<&str> {
        match self {
            ParticipantIdentity::Guest { name } => Some(name),
            ParticipantIdentity::User { .. } => None,
        }
    }
}

impl fmt::Display for ParticipantIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantIdentity::User { id } => write!(f, "user {}", id),
            ParticipantIdentity::Guest { name } => write!(f, "guest '{}'", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_name_is_trimmed() {
        let identity = ParticipantIdentity::guest("  Alex ").unwrap();
        assert_eq!(identity.guest_name(), Some("Alex"));
    }

    #[test]
    fn test_blank_guest_name_rejected() {
        assert_eq!(
            ParticipantIdentity::guest("   "),
            Err(IdentityError::EmptyGuestName)
        );
        assert_eq!(ParticipantIdentity::user(""), Err(IdentityError::EmptyUserId));
    }

    #[test]
    fn test_storage_keys_never_collide_across_kinds() {
        let guest = ParticipantIdentity::guest("u123").unwrap();
        let user = ParticipantIdentity::user("u123").unwrap();

        assert_eq!(guest.storage_key(), "GUEST#u123");
        assert_eq!(user.storage_key(), "USER#u123");
        assert_ne!(guest, user);
    }

    #[test]
    fn test_numeric_guest_name_stays_a_guest() {
        let identity = ParticipantIdentity::guest("12345").unwrap();
        assert!(identity.is_guest());
    }

    #[test]
    fn test_identity_serialization_is_tagged() {
        let identity = ParticipantIdentity::guest("Alex").unwrap();
        let serialized = serde_json::to_string(&identity).unwrap();
        assert_eq!(serialized, r#"{"kind":"Guest","name":"Alex"}"#);

        let user: ParticipantIdentity =
            serde_json::from_str(r#"{"kind":"User","id":"u1"}"#).unwrap();
        assert_eq!(user, ParticipantIdentity::User { id: "u1".to_string() });
    }
}
