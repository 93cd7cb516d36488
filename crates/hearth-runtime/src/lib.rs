//! Hearth Runtime
//!
//! The async half of the Hearth client:
//! - `SessionProvider`: republishes the backend's auth-state stream as a `Session`
//! - `UnreadPoller`: keeps the unread notification and message counts fresh
//! - `NotificationFeed`: loads the notifications page and marks it read
//! - `AppRuntime`: owns all of the above plus the router and shell state
//!
//! `hearth-core` holds the plain data types and traits; this crate owns every
//! spawned task and makes sure each one is aborted on shutdown.

pub mod builder;
pub mod notifications;
pub mod poller;
mod runtime;
pub mod session;

pub use builder::RuntimeBuilder;
pub use notifications::NotificationFeed;
pub use poller::UnreadPoller;
pub use runtime::AppRuntime;
pub use session::SessionProvider;

// Re-export core types for convenience
pub use hearth_core::{
    BackendClient, Credentials, HearthConfig, HearthError, HearthResult, Identity, Navigation,
    NotificationEntry, Session, Tab, UnreadCounts, UnreadSnapshot, View,
};
