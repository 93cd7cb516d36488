//! Seed data for the in-memory backend

use std::path::Path;

use serde::{Deserialize, Serialize};

use hearth_core::{
    ActorProfile, HearthError, HearthResult, Identity, Message, MessageId, Notification,
    NotificationId, NotificationKind, Timestamp, UserId,
};

/// Account known to the in-memory auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureUser {
    pub uid: UserId,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl FixtureUser {
    pub fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: Some(self.email.clone()),
            display_name: self.display_name.clone(),
        }
    }
}

/// Everything the in-memory backend starts with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<FixtureUser>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// User signed in when the backend starts
    #[serde(default)]
    pub signed_in: Option<UserId>,
}

impl Fixture {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> HearthResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            HearthError::invalid_value("fixture", format!("{}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            HearthError::invalid_value("fixture", format!("{}: {}", path.display(), e))
        })
    }

    /// Small social graph used by the CLI demo and tests.
    ///
    /// `ada` has three notifications (two unread) and two unread messages;
    /// `grace` has nothing.
    pub fn demo(now: Timestamp) -> Self {
        let ada = UserId::new("ada");
        let grace = UserId::new("grace");
        let alan = ActorProfile {
            username: "alan".to_string(),
            full_name: Some("Alan Turing".to_string()),
        };

        Self {
            users: vec![
                FixtureUser {
                    uid: ada.clone(),
                    email: "ada@example.com".to_string(),
                    password: "analytical".to_string(),
                    display_name: Some("Ada Lovelace".to_string()),
                },
                FixtureUser {
                    uid: grace.clone(),
                    email: "grace@example.com".to_string(),
                    password: "cobol".to_string(),
                    display_name: Some("Grace Hopper".to_string()),
                },
            ],
            notifications: vec![
                Notification {
                    id: NotificationId::new(),
                    recipient: ada.clone(),
                    kind: NotificationKind::Like,
                    content: "liked your post".to_string(),
                    actor: Some(alan.clone()),
                    created_at: now.sub_seconds(90),
                    is_read: false,
                },
                Notification {
                    id: NotificationId::new(),
                    recipient: ada.clone(),
                    kind: NotificationKind::FriendRequest,
                    content: "sent you a friend request".to_string(),
                    actor: Some(ActorProfile {
                        username: "grace".to_string(),
                        full_name: None,
                    }),
                    created_at: now.sub_seconds(3 * 3600),
                    is_read: false,
                },
                Notification {
                    id: NotificationId::new(),
                    recipient: ada.clone(),
                    kind: NotificationKind::Comment,
                    content: "commented on your post".to_string(),
                    actor: Some(alan),
                    created_at: now.sub_seconds(2 * 86_400),
                    is_read: true,
                },
            ],
            messages: vec![
                Message {
                    id: MessageId::new(),
                    sender: grace.clone(),
                    recipient: ada.clone(),
                    content: "Lunch?".to_string(),
                    created_at: now.sub_seconds(600),
                    is_read: false,
                },
                Message {
                    id: MessageId::new(),
                    sender: grace,
                    recipient: ada,
                    content: "Bring the notes.".to_string(),
                    created_at: now.sub_seconds(300),
                    is_read: false,
                },
            ],
            signed_in: None,
        }
    }
}
