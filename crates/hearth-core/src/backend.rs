//! Backend collaborator contracts
//!
//! The managed backend (authentication, document store, blob store) is an
//! external service. The core only talks to it through these traits, and the
//! handles are bundled in a `BackendClient` that is built once at startup and
//! passed to whoever needs it.
//!
//! Concrete implementations live outside this crate:
//! - `MemoryBackend` in the `hearth-harness` crate

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::BackendConfig;
use crate::errors::HearthResult;
use crate::notifications::Notification;
use crate::types::{Credentials, Identity, NotificationId};
use crate::unread::CountResponse;

/// Stream of auth-state changes; `None` means signed out
pub type AuthStateStream = BoxStream<'static, HearthResult<Option<Identity>>>;

// ----------------------------------------------------------------------------
// Collaborator Traits
// ----------------------------------------------------------------------------

/// Authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Subscribe to auth-state changes.
    ///
    /// The stream must yield the current state first, then every change.
    fn auth_state_stream(&self) -> AuthStateStream;

    async fn sign_in(&self, credentials: Credentials) -> HearthResult<Identity>;

    async fn sign_out(&self) -> HearthResult<()>;
}

/// Document database holding notifications and messages
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn unread_notification_count(&self, identity: &Identity) -> HearthResult<CountResponse>;

    async fn unread_message_count(&self, identity: &Identity) -> HearthResult<CountResponse>;

    /// Latest notifications for `identity`, newest first
    async fn recent_notifications(
        &self,
        identity: &Identity,
        limit: usize,
    ) -> HearthResult<Vec<Notification>>;

    async fn mark_notifications_read(&self, ids: &[NotificationId]) -> HearthResult<()>;
}

/// Object storage for uploads such as avatars
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `path` and return a download URL
    async fn put(&self, path: &str, bytes: Vec<u8>) -> HearthResult<String>;

    async fn get(&self, path: &str) -> HearthResult<Vec<u8>>;
}

/// The two queries the unread poller needs
#[async_trait]
pub trait UnreadCountSource: Send + Sync {
    async fn unread_notification_count(&self, identity: &Identity) -> HearthResult<CountResponse>;

    async fn unread_message_count(&self, identity: &Identity) -> HearthResult<CountResponse>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> UnreadCountSource for T {
    async fn unread_notification_count(&self, identity: &Identity) -> HearthResult<CountResponse> {
        DocumentStore::unread_notification_count(self, identity).await
    }

    async fn unread_message_count(&self, identity: &Identity) -> HearthResult<CountResponse> {
        DocumentStore::unread_message_count(self, identity).await
    }
}

/// Exposes a type-erased document store as an `UnreadCountSource`
struct DocumentCounts(Arc<dyn DocumentStore>);

#[async_trait]
impl UnreadCountSource for DocumentCounts {
    async fn unread_notification_count(&self, identity: &Identity) -> HearthResult<CountResponse> {
        DocumentStore::unread_notification_count(self.0.as_ref(), identity).await
    }

    async fn unread_message_count(&self, identity: &Identity) -> HearthResult<CountResponse> {
        DocumentStore::unread_message_count(self.0.as_ref(), identity).await
    }
}

// ----------------------------------------------------------------------------
// Backend Client Handle
// ----------------------------------------------------------------------------

/// Process-wide handles to the backend services
#[derive(Clone)]
pub struct BackendClient {
    config: Arc<BackendConfig>,
    auth: Arc<dyn AuthProvider>,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl BackendClient {
    /// Validate the configuration and bundle the service handles
    pub fn new(
        config: BackendConfig,
        auth: Arc<dyn AuthProvider>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> HearthResult<Self> {
        config.validate()?;
        tracing::info!("Backend client initialized for project {}", config.project_id);
        Ok(Self {
            config: Arc::new(config),
            auth,
            documents,
            blobs,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        Arc::clone(&self.auth)
    }

    pub fn documents(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.documents)
    }

    pub fn blobs(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.blobs)
    }

    /// The document store narrowed to the unread-count queries
    pub fn unread_counts(&self) -> Arc<dyn UnreadCountSource> {
        Arc::new(DocumentCounts(self.documents()))
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("project_id", &self.config.project_id)
            .finish_non_exhaustive()
    }
}
