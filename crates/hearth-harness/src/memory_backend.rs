//! In-memory backend for testing and demos
//!
//! Implements every backend collaborator trait over plain collections. Each
//! operation can be given a simulated latency, be forced to fail, or be fed a
//! queue of scripted results, and every call is counted so tests can assert
//! on exactly what the client asked for.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;
use tokio::sync::{watch, RwLock};
use tokio::time::{sleep, Duration};
use tracing::debug;

use hearth_core::{
    AuthProvider, AuthStateStream, BackendClient, BackendConfig, BlobStore, CountResponse,
    Credentials, DocumentStore, HearthError, HearthResult, Identity, Message, Notification,
    NotificationId, UserId,
};

use crate::fixture::{Fixture, FixtureUser};

type AuthSignal = HearthResult<Option<Identity>>;

// ----------------------------------------------------------------------------
// Operations
// ----------------------------------------------------------------------------

/// Backend operations that can be counted, delayed or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SignIn,
    SignOut,
    NotificationCount,
    MessageCount,
    RecentNotifications,
    MarkRead,
    BlobPut,
    BlobGet,
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::SignIn => "sign_in",
            Operation::SignOut => "sign_out",
            Operation::NotificationCount => "unread_notification_count",
            Operation::MessageCount => "unread_message_count",
            Operation::RecentNotifications => "recent_notifications",
            Operation::MarkRead => "mark_notifications_read",
            Operation::BlobPut => "blob_put",
            Operation::BlobGet => "blob_get",
        }
    }
}

#[derive(Debug, Default)]
struct Behaviour {
    calls: HashMap<Operation, u64>,
    latency: HashMap<Operation, Duration>,
    failing: HashMap<Operation, HearthError>,
    scripted_counts: HashMap<Operation, VecDeque<HearthResult<CountResponse>>>,
}

#[derive(Debug, Default)]
struct Documents {
    users: Vec<FixtureUser>,
    notifications: Vec<Notification>,
    messages: Vec<Message>,
    blobs: HashMap<String, Vec<u8>>,
}

// ----------------------------------------------------------------------------
// Memory Backend
// ----------------------------------------------------------------------------

/// Auth, document and blob services backed by in-process collections
pub struct MemoryBackend {
    auth_state: watch::Sender<AuthSignal>,
    documents: RwLock<Documents>,
    behaviour: Mutex<Behaviour>,
    bucket: String,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Empty backend with nobody signed in
    pub fn new() -> Self {
        Self::from_fixture(Fixture::default())
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        let signed_in = fixture.signed_in.as_ref().and_then(|uid| {
            fixture
                .users
                .iter()
                .find(|user| &user.uid == uid)
                .map(FixtureUser::identity)
        });
        let (auth_state, _) = watch::channel(Ok(signed_in));

        Self {
            auth_state,
            documents: RwLock::new(Documents {
                users: fixture.users,
                notifications: fixture.notifications,
                messages: fixture.messages,
                blobs: HashMap::new(),
            }),
            behaviour: Mutex::new(Behaviour::default()),
            bucket: BackendConfig::default().storage_bucket,
        }
    }

    /// Bundle this backend as every service of a `BackendClient`
    pub fn into_client(self: Arc<Self>, config: BackendConfig) -> HearthResult<BackendClient> {
        BackendClient::new(config, self.clone(), self.clone(), self)
    }

    // ------------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------------

    /// Push an auth-state change to every subscriber
    pub fn set_auth_state(&self, identity: Option<Identity>) {
        self.auth_state.send_modify(|state| *state = Ok(identity));
    }

    /// Push an error item onto the auth-state stream
    pub fn fail_auth_stream<T: Into<String>>(&self, reason: T) {
        let error = HearthError::Session(hearth_core::SessionError::StreamFailed {
            reason: reason.into(),
        });
        self.auth_state.send_modify(|state| *state = Err(error));
    }

    /// Number of live auth-state subscriptions
    pub fn auth_subscribers(&self) -> usize {
        self.auth_state.receiver_count()
    }

    pub fn set_latency(&self, operation: Operation, latency: Duration) {
        self.behaviour().latency.insert(operation, latency);
    }

    /// Make every call to `operation` fail with `error` until cleared
    pub fn set_failing(&self, operation: Operation, error: HearthError) {
        self.behaviour().failing.insert(operation, error);
    }

    pub fn clear_failure(&self, operation: Operation) {
        self.behaviour().failing.remove(&operation);
    }

    /// Queue a result for the next count query of `operation`.
    ///
    /// Only `NotificationCount` and `MessageCount` consult the queue.
    pub fn script_count(&self, operation: Operation, result: HearthResult<CountResponse>) {
        self.behaviour()
            .scripted_counts
            .entry(operation)
            .or_default()
            .push_back(result);
    }

    pub fn call_count(&self, operation: Operation) -> u64 {
        self.behaviour().calls.get(&operation).copied().unwrap_or(0)
    }

    /// Current notifications for `uid`, in insertion order
    pub async fn notifications_for(&self, uid: &UserId) -> Vec<Notification> {
        self.documents
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| &n.recipient == uid)
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn behaviour(&self) -> std::sync::MutexGuard<'_, Behaviour> {
        self.behaviour
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count the call, apply latency, and return a forced failure if any
    async fn enter(&self, operation: Operation) -> HearthResult<()> {
        let (latency, failure) = {
            let mut behaviour = self.behaviour();
            *behaviour.calls.entry(operation).or_insert(0) += 1;
            (
                behaviour.latency.get(&operation).copied(),
                behaviour.failing.get(&operation).cloned(),
            )
        };

        debug!("Memory backend call: {}", operation.name());

        if let Some(latency) = latency {
            sleep(latency).await;
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn scripted(&self, operation: Operation) -> Option<HearthResult<CountResponse>> {
        self.behaviour()
            .scripted_counts
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
    }
}

// ----------------------------------------------------------------------------
// Auth Provider
// ----------------------------------------------------------------------------

#[async_trait]
impl AuthProvider for MemoryBackend {
    fn auth_state_stream(&self) -> AuthStateStream {
        let receiver = self.auth_state.subscribe();

        Box::pin(stream::unfold(
            (receiver, true),
            |(mut receiver, first)| async move {
                if !first && receiver.changed().await.is_err() {
                    return None;
                }
                let signal = receiver.borrow_and_update().clone();
                Some((signal, (receiver, false)))
            },
        ))
    }

    async fn sign_in(&self, credentials: Credentials) -> HearthResult<Identity> {
        self.enter(Operation::SignIn).await?;

        let identity = self
            .documents
            .read()
            .await
            .users
            .iter()
            .find(|user| user.email == credentials.email && user.password == credentials.password)
            .map(FixtureUser::identity)
            .ok_or_else(|| HearthError::invalid_credentials(&credentials.email))?;

        self.set_auth_state(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> HearthResult<()> {
        self.enter(Operation::SignOut).await?;
        self.set_auth_state(None);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Document Store
// ----------------------------------------------------------------------------

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn unread_notification_count(&self, identity: &Identity) -> HearthResult<CountResponse> {
        self.enter(Operation::NotificationCount).await?;
        if let Some(scripted) = self.scripted(Operation::NotificationCount) {
            return scripted;
        }

        let count = self
            .documents
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.recipient == identity.uid && !n.is_read)
            .count();
        Ok(CountResponse::new(count as i64))
    }

    async fn unread_message_count(&self, identity: &Identity) -> HearthResult<CountResponse> {
        self.enter(Operation::MessageCount).await?;
        if let Some(scripted) = self.scripted(Operation::MessageCount) {
            return scripted;
        }

        let count = self
            .documents
            .read()
            .await
            .messages
            .iter()
            .filter(|m| m.recipient == identity.uid && !m.is_read)
            .count();
        Ok(CountResponse::new(count as i64))
    }

    async fn recent_notifications(
        &self,
        identity: &Identity,
        limit: usize,
    ) -> HearthResult<Vec<Notification>> {
        self.enter(Operation::RecentNotifications).await?;

        let mut notifications: Vec<Notification> = self
            .documents
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.recipient == identity.uid)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(limit);
        Ok(notifications)
    }

    async fn mark_notifications_read(&self, ids: &[NotificationId]) -> HearthResult<()> {
        self.enter(Operation::MarkRead).await?;

        let mut documents = self.documents.write().await;
        for notification in documents
            .notifications
            .iter_mut()
            .filter(|n| ids.contains(&n.id))
        {
            notification.is_read = true;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Blob Store
// ----------------------------------------------------------------------------

#[async_trait]
impl BlobStore for MemoryBackend {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> HearthResult<String> {
        self.enter(Operation::BlobPut).await?;
        self.documents
            .write()
            .await
            .blobs
            .insert(path.to_string(), bytes);
        Ok(format!("memory://{}/{}", self.bucket, path.trim_start_matches('/')))
    }

    async fn get(&self, path: &str) -> HearthResult<Vec<u8>> {
        self.enter(Operation::BlobGet).await?;
        self.documents
            .read()
            .await
            .blobs
            .get(path)
            .cloned()
            .ok_or_else(|| HearthError::not_found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use hearth_core::{NotificationKind, Timestamp};

    fn ada() -> Identity {
        Identity::new("ada")
    }

    #[tokio::test]
    async fn counts_unread_rows_for_recipient() {
        let backend = MemoryBackend::from_fixture(Fixture::demo(Timestamp::new(1_700_000_000_000)));
        let notifications = DocumentStore::unread_notification_count(&backend, &ada())
            .await
            .unwrap();
        let messages = DocumentStore::unread_message_count(&backend, &ada())
            .await
            .unwrap();
        assert_eq!(notifications.value(), 2);
        assert_eq!(messages.value(), 2);

        let grace = Identity::new("grace");
        let none = DocumentStore::unread_notification_count(&backend, &grace)
            .await
            .unwrap();
        assert_eq!(none.value(), 0);
    }

    #[tokio::test]
    async fn recent_notifications_are_newest_first_and_limited() {
        let backend = MemoryBackend::from_fixture(Fixture::demo(Timestamp::new(1_700_000_000_000)));
        let list = backend.recent_notifications(&ada(), 2).await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].created_at >= list[1].created_at);
        assert_eq!(list[0].kind, NotificationKind::Like);
    }

    #[tokio::test]
    async fn scripted_counts_take_priority_then_drain() {
        let backend = MemoryBackend::new();
        backend.script_count(Operation::MessageCount, Ok(CountResponse::new(5)));
        backend.script_count(Operation::MessageCount, Err(HearthError::unavailable("down")));

        let first = DocumentStore::unread_message_count(&backend, &ada()).await;
        let second = DocumentStore::unread_message_count(&backend, &ada()).await;
        let third = DocumentStore::unread_message_count(&backend, &ada()).await;

        assert_eq!(first.unwrap().value(), 5);
        assert!(second.is_err());
        assert_eq!(third.unwrap().value(), 0);
        assert_eq!(backend.call_count(Operation::MessageCount), 3);
    }

    #[tokio::test]
    async fn forced_failures_apply_until_cleared() {
        let backend = MemoryBackend::new();
        backend.set_failing(Operation::NotificationCount, HearthError::unavailable("down"));
        assert!(DocumentStore::unread_notification_count(&backend, &ada())
            .await
            .is_err());
        backend.clear_failure(Operation::NotificationCount);
        assert!(DocumentStore::unread_notification_count(&backend, &ada())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn auth_stream_yields_current_state_then_changes() {
        let backend = MemoryBackend::from_fixture(Fixture::demo(Timestamp::new(0)));
        let mut states = backend.auth_state_stream();

        assert_eq!(states.next().await, Some(Ok(None)));

        let identity = backend
            .sign_in(Credentials::new("ada@example.com", "analytical"))
            .await
            .unwrap();
        assert_eq!(identity.uid.as_str(), "ada");
        assert_eq!(states.next().await, Some(Ok(Some(identity))));

        backend.sign_out().await.unwrap();
        assert_eq!(states.next().await, Some(Ok(None)));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let backend = MemoryBackend::from_fixture(Fixture::demo(Timestamp::new(0)));
        let err = backend
            .sign_in(Credentials::new("ada@example.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err, HearthError::invalid_credentials("ada@example.com"));
    }

    #[tokio::test]
    async fn blobs_round_trip_through_download_urls() {
        let backend = MemoryBackend::new();
        let url = backend.put("avatars/ada.png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(url, "memory://hearth-local.appspot.com/avatars/ada.png");
        assert_eq!(backend.get("avatars/ada.png").await.unwrap(), vec![1, 2, 3]);
        assert!(backend.get("avatars/missing.png").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated() {
        let backend = MemoryBackend::new();
        backend.set_latency(Operation::MessageCount, Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        DocumentStore::unread_message_count(&backend, &ada())
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
