//! Notification documents and their display helpers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MessageId, NotificationId, Timestamp, UserId};

/// Number of notifications fetched per load
pub const DEFAULT_NOTIFICATION_PAGE: usize = 50;

const MINUTE_SECS: u64 = 60;
const HOUR_SECS: u64 = 60 * MINUTE_SECS;
const DAY_SECS: u64 = 24 * HOUR_SECS;
const WEEK_SECS: u64 = 7 * DAY_SECS;

// ----------------------------------------------------------------------------
// Notification Documents
// ----------------------------------------------------------------------------

/// What triggered a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
    FriendRequest,
    FriendAccepted,
    Message,
    /// Kinds this client does not know, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl NotificationKind {
    /// Short label used in place of an icon
    pub fn label(&self) -> &str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::FriendRequest => "friend request",
            NotificationKind::FriendAccepted => "friend accepted",
            NotificationKind::Message => "message",
            NotificationKind::Other(kind) => kind,
        }
    }
}

/// Profile of the user that caused the notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Notification row as stored in the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub content: String,
    #[serde(default)]
    pub actor: Option<ActorProfile>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub is_read: bool,
}

/// Direct message row; the client only counts unread ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: UserId,
    pub recipient: UserId,
    pub content: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub is_read: bool,
}

// ----------------------------------------------------------------------------
// Display Helpers
// ----------------------------------------------------------------------------

/// Name shown next to a notification
pub fn actor_display_name(actor: Option<&ActorProfile>) -> &str {
    match actor {
        Some(ActorProfile {
            full_name: Some(name),
            ..
        }) if !name.is_empty() => name,
        Some(profile) if !profile.username.is_empty() => &profile.username,
        _ => "Someone",
    }
}

/// Single letter shown in the avatar bubble
pub fn avatar_initial(actor: Option<&ActorProfile>) -> String {
    actor
        .and_then(|profile| profile.username.chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "U".to_string())
}

/// Relative label such as `just now`, `5m ago` or `3d ago`.
///
/// Anything a week or older falls back to the UTC calendar date.
pub fn format_time_ago(now: Timestamp, then: Timestamp) -> String {
    let seconds = (now - then) / 1000;

    if seconds < MINUTE_SECS {
        "just now".to_string()
    } else if seconds < HOUR_SECS {
        format!("{}m ago", seconds / MINUTE_SECS)
    } else if seconds < DAY_SECS {
        format!("{}h ago", seconds / HOUR_SECS)
    } else if seconds < WEEK_SECS {
        format!("{}d ago", seconds / DAY_SECS)
    } else {
        DateTime::<Utc>::from_timestamp_millis(then.as_millis() as i64)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "long ago".to_string())
    }
}

/// Notification ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEntry {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub actor_name: String,
    pub avatar_initial: String,
    pub content: String,
    pub time_ago: String,
    /// Read flag as loaded, before this load marked it read
    pub was_unread: bool,
}

impl NotificationEntry {
    pub fn from_notification(notification: &Notification, now: Timestamp) -> Self {
        let actor = notification.actor.as_ref();
        Self {
            id: notification.id,
            kind: notification.kind.clone(),
            actor_name: actor_display_name(actor).to_string(),
            avatar_initial: avatar_initial(actor),
            content: notification.content.clone(),
            time_ago: format_time_ago(now, notification.created_at),
            was_unread: !notification.is_read,
        }
    }
}
