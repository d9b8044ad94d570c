use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A user-facing message describing the outcome of an operation. Rendering is
/// left to the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: &str, message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Success,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }

    /// `guest_name` is `None` for logged-in users, who are addressed directly.
    pub fn attendance(attending: bool, guest_name: Option<&str>) -> Self {
        match (attending, guest_name) {
            (true, Some(name)) => Notification::success(
                "RSVP confirmed!",
                format!("{} has been added to the event attendees.", name),
            ),
            (true, None) => Notification::success(
                "You're going!",
                "You've been added to the event attendees.",
            ),
            (false, Some(name)) => Notification::success(
                "RSVP cancelled",
                format!("{} has been removed from the event attendees.", name),
            ),
            (false, None) => Notification::success(
                "RSVP updated",
                "You've been removed from the event attendees.",
            ),
        }
    }

    pub fn rankings_saved() -> Self {
        Notification::success(
            "Preferences saved",
            "Your game rankings have been saved successfully.",
        )
    }

    pub fn exclusions_saved() -> Self {
        Notification::success(
            "Exclusions saved",
            "Your game exclusions have been saved successfully.",
        )
    }

    pub fn preferences_saved() -> Self {
        Notification::success(
            "Preferences saved",
            "Your game rankings and exclusions have been saved.",
        )
    }
}
