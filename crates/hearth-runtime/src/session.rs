//! Session Provider
//!
//! Subscribes to the auth collaborator's state stream and republishes it as a
//! `Session` on a watch channel. Every subscriber sees the same sequence of
//! sessions; the first event flips `loading` off for good.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use hearth_core::{AuthProvider, Credentials, HearthResult, Identity, Session, SessionError};

// ----------------------------------------------------------------------------
// Session Provider
// ----------------------------------------------------------------------------

/// Owns the auth-state subscription and publishes the current session
pub struct SessionProvider {
    auth: Arc<dyn AuthProvider>,
    state: Arc<watch::Sender<Session>>,
    listener: Option<JoinHandle<()>>,
}

impl SessionProvider {
    /// Subscribe to the auth-state stream and start publishing sessions
    pub fn start(auth: Arc<dyn AuthProvider>) -> Self {
        let (state, _) = watch::channel(Session::initial());
        let state = Arc::new(state);

        let mut events = auth.auth_state_stream();
        let publisher = Arc::clone(&state);

        let listener = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let identity = match event {
                    Ok(identity) => identity,
                    Err(e) => {
                        // No retry: an unreadable auth state means signed out
                        warn!("Auth state stream error, treating as signed out: {}", e);
                        None
                    }
                };

                publisher.send_if_modified(|session| {
                    let before = session.clone();
                    session.apply_auth_event(identity);
                    *session != before
                });
            }
            debug!("Auth state stream ended");
        });

        info!("Session provider started");

        Self {
            auth,
            state,
            listener: Some(listener),
        }
    }

    /// Receiver that observes every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Wait for the initial auth-state resolution
    pub async fn resolved(&self) -> HearthResult<Session> {
        let mut receiver = self.subscribe();
        let session = receiver
            .wait_for(|session| !session.is_loading())
            .await
            .map_err(|_| SessionError::ProviderClosed)?;
        Ok(session.clone())
    }

    /// Delegate sign-in; the session itself changes through the stream
    pub async fn sign_in(&self, credentials: Credentials) -> HearthResult<Identity> {
        info!("Signing in {}", credentials.email);
        self.auth.sign_in(credentials).await
    }

    pub async fn sign_out(&self) -> HearthResult<()> {
        info!("Signing out");
        self.auth.sign_out().await
    }

    /// Stop listening to the auth-state stream
    pub fn shutdown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            info!("Session provider stopped");
        }
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_harness::{Fixture, MemoryBackend};
    use hearth_core::Timestamp;
    use std::time::Duration;

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::from_fixture(Fixture::demo(Timestamp::new(0))))
    }

    #[tokio::test]
    async fn resolves_to_signed_out() {
        let backend = backend();
        let provider = SessionProvider::start(backend.clone());
        let session = provider.resolved().await.unwrap();
        assert!(!session.is_loading());
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn follows_sign_in_and_sign_out() {
        let backend = backend();
        let provider = SessionProvider::start(backend.clone());
        let mut sessions = provider.subscribe();
        provider.resolved().await.unwrap();

        provider
            .sign_in(Credentials::new("ada@example.com", "analytical"))
            .await
            .unwrap();
        let session = sessions
            .wait_for(|s| s.is_signed_in())
            .await
            .unwrap()
            .clone();
        assert_eq!(session.identity().unwrap().uid.as_str(), "ada");

        provider.sign_out().await.unwrap();
        let session = sessions
            .wait_for(|s| !s.is_signed_in())
            .await
            .unwrap()
            .clone();
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn stream_errors_collapse_to_signed_out() {
        let backend = backend();
        backend.set_auth_state(Some(Identity::new("ada")));
        let provider = SessionProvider::start(backend.clone());
        let mut sessions = provider.subscribe();
        sessions.wait_for(|s| s.is_signed_in()).await.unwrap();

        backend.fail_auth_stream("token refresh failed");
        let session = sessions
            .wait_for(|s| !s.is_signed_in())
            .await
            .unwrap()
            .clone();
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn shutdown_unsubscribes() {
        let backend = backend();
        let mut provider = SessionProvider::start(backend.clone());
        provider.resolved().await.unwrap();
        assert_eq!(backend.auth_subscribers(), 1);

        provider.shutdown();
        tokio::time::timeout(Duration::from_secs(1), async {
            while backend.auth_subscribers() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("listener should release its subscription");
    }
}
