//! Hearth application runtime
//!
//! Ties the session provider, the unread poller, the notification feed and
//! the router together behind one handle. The CLI and the integration tests
//! drive the client entirely through `AppRuntime`.

use std::fmt;

use tokio::sync::watch;
use tracing::info;

use hearth_core::{
    BackendClient, Credentials, HearthConfig, HearthResult, Identity, Navigation,
    NotificationEntry, Router, Session, SessionError, ShellState, Tab, TopicTable,
    UnreadSnapshot,
};

use crate::builder::RuntimeBuilder;
use crate::notifications::NotificationFeed;
use crate::poller::UnreadPoller;
use crate::session::SessionProvider;

// ----------------------------------------------------------------------------
// App Runtime
// ----------------------------------------------------------------------------

/// Handle to a running Hearth client
pub struct AppRuntime {
    backend: BackendClient,
    session: SessionProvider,
    poller: UnreadPoller,
    feed: NotificationFeed,
    router: Router,
    shell: ShellState,
    running: bool,
}

impl AppRuntime {
    /// Start a runtime with the built-in topics and the system clock
    pub fn start(backend: BackendClient, config: HearthConfig) -> HearthResult<Self> {
        RuntimeBuilder::new(backend).with_config(config).start()
    }

    pub(crate) fn from_parts(
        backend: BackendClient,
        session: SessionProvider,
        poller: UnreadPoller,
        feed: NotificationFeed,
        router: Router,
        shell: ShellState,
    ) -> Self {
        Self {
            backend,
            session,
            poller,
            feed,
            router,
            shell,
            running: true,
        }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    pub fn session(&self) -> Session {
        self.session.current()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Wait until the first auth-state event has arrived
    pub async fn resolved(&self) -> HearthResult<Session> {
        self.session.resolved().await
    }

    /// Sign in and wait for the session to reflect the new identity
    pub async fn sign_in(&self, credentials: Credentials) -> HearthResult<Identity> {
        let identity = self.session.sign_in(credentials).await?;
        self.wait_for_session(|session| {
            session.identity().map(|current| &current.uid) == Some(&identity.uid)
        })
        .await?;
        Ok(identity)
    }

    /// Sign out and wait for the session to clear
    pub async fn sign_out(&self) -> HearthResult<()> {
        self.session.sign_out().await?;
        self.wait_for_session(|session| !session.is_loading() && !session.is_signed_in())
            .await
    }

    async fn wait_for_session(&self, ready: impl FnMut(&Session) -> bool) -> HearthResult<()> {
        let mut sessions = self.session.subscribe();
        sessions
            .wait_for(ready)
            .await
            .map_err(|_| SessionError::ProviderClosed)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Unread Counts
    // ------------------------------------------------------------------------

    pub fn unread(&self) -> UnreadSnapshot {
        self.poller.snapshot()
    }

    pub fn subscribe_unread(&self) -> watch::Receiver<UnreadSnapshot> {
        self.poller.subscribe()
    }

    /// Run an extra poll tick now; `None` when signed out
    pub async fn refresh_unread(&self) -> Option<UnreadSnapshot> {
        self.poller.refresh().await
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Resolve `path` against the current session, following redirects
    pub fn navigate(&self, path: &str) -> Navigation {
        self.router.navigate(path, &self.session())
    }

    pub fn topics(&self) -> &TopicTable {
        self.router.topics()
    }

    pub fn shell(&self) -> &ShellState {
        &self.shell
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.shell.select(tab);
    }

    // ------------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------------

    /// Load the notifications page for the signed-in user
    pub async fn notifications(&self) -> HearthResult<Vec<NotificationEntry>> {
        let session = self.session();
        let identity = session.identity().ok_or(SessionError::NotSignedIn)?;
        self.feed.load(identity).await
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running && self.poller.is_running()
    }

    /// Cancel the polling timer and the auth-state subscription
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        info!("Shutting down Hearth runtime");
        self.poller.shutdown();
        self.session.shutdown();
        self.running = false;
    }
}

impl fmt::Debug for AppRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRuntime")
            .field("backend", &self.backend)
            .field("active_tab", &self.shell.active_tab())
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{BackendConfig, HearthError, Timestamp, UnreadCounts, View};
    use hearth_harness::{Fixture, MemoryBackend};
    use std::sync::Arc;

    fn start() -> (Arc<MemoryBackend>, AppRuntime) {
        let backend = Arc::new(MemoryBackend::from_fixture(Fixture::demo(Timestamp::now())));
        let client = backend.clone().into_client(BackendConfig::default()).unwrap();
        let runtime = AppRuntime::start(client, HearthConfig::testing()).unwrap();
        (backend, runtime)
    }

    fn ada() -> Credentials {
        Credentials::new("ada@example.com", "analytical")
    }

    #[tokio::test]
    async fn exposes_the_backend_project() {
        let (_backend, runtime) = start();
        assert_eq!(runtime.backend().config().project_id, "hearth-local");
        assert!(format!("{:?}", runtime).starts_with("AppRuntime"));
    }

    #[tokio::test]
    async fn home_requires_sign_in() {
        let (_backend, runtime) = start();
        runtime.resolved().await.unwrap();
        let navigation = runtime.navigate("/");
        assert_eq!(navigation.view, View::SignIn);

        runtime.sign_in(ada()).await.unwrap();
        assert_eq!(runtime.navigate("/").view, View::Shell);
    }

    #[tokio::test]
    async fn sign_in_publishes_counts_and_sign_out_clears_them() {
        let (_backend, runtime) = start();
        let mut unread = runtime.subscribe_unread();

        runtime.sign_in(ada()).await.unwrap();
        let snapshot = *unread
            .wait_for(|s| s.counts == UnreadCounts::new(2, 2))
            .await
            .unwrap();
        assert!(snapshot.tick > 0);

        runtime.sign_out().await.unwrap();
        unread
            .wait_for(|s| s.tick > snapshot.tick && s.counts == UnreadCounts::zero())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn notifications_require_a_session() {
        let (_backend, runtime) = start();
        runtime.resolved().await.unwrap();
        let err = runtime.notifications().await.unwrap_err();
        assert_eq!(err, HearthError::Session(SessionError::NotSignedIn));

        tokio_test::assert_ok!(runtime.sign_in(ada()).await);
        let entries = tokio_test::assert_ok!(runtime.notifications().await);
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn bad_credentials_leave_session_signed_out() {
        let (_backend, runtime) = start();
        runtime.resolved().await.unwrap();
        tokio_test::assert_err!(
            runtime
                .sign_in(Credentials::new("ada@example.com", "nope"))
                .await
        );
        assert!(!runtime.session().is_signed_in());
    }

    #[tokio::test]
    async fn shell_tab_selection() {
        let (_backend, mut runtime) = start();
        assert_eq!(runtime.shell().active_tab(), Tab::Feed);
        runtime.select_tab(Tab::Notifications);
        assert_eq!(runtime.shell().active_tab(), Tab::Notifications);
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (backend, mut runtime) = start();
        runtime.resolved().await.unwrap();
        runtime.shutdown();
        runtime.shutdown();
        assert!(!runtime.is_running());

        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while backend.auth_subscribers() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("auth subscription should be released");
    }
}
