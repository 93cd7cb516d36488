//! Hearth Core
//!
//! Foundational types for the Hearth social client: sessions, unread counts,
//! routing and auth guards, the shared topic table, notification display
//! helpers, and the traits through which the managed backend is reached.
//! Nothing in this crate spawns tasks; the async machinery lives in
//! `hearth-runtime`.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod backend;
pub mod config;
pub mod errors;
pub mod notifications;
pub mod routing;
pub mod session;
pub mod shell;
pub mod topics;
pub mod types;
pub mod unread;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use backend::{
    AuthProvider, AuthStateStream, BackendClient, BlobStore, DocumentStore, UnreadCountSource,
};
pub use config::{BackendConfig, HearthConfig, NotificationConfig, PollerConfig};
pub use errors::{BackendError, ConfigError, HearthError, HearthResult, Result, SessionError};
pub use notifications::{
    format_time_ago, ActorProfile, Message, Notification, NotificationEntry, NotificationKind,
};
pub use routing::{Navigation, Route, RouteOutcome, Router, View, HOME_PATH};
pub use session::Session;
pub use shell::{ShellState, Tab};
pub use topics::{slugify, Topic, TopicTable, TopicView, TRENDING_TOPICS};
pub use types::{
    Credentials, FixedTimeSource, Identity, MessageId, NotificationId, SystemTimeSource,
    TimeSource, Timestamp, UserId,
};
pub use unread::{
    combine_counts, CountResponse, FallbackPolicy, UnreadBoard, UnreadCounts, UnreadSnapshot,
};
