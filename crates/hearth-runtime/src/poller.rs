//! Unread-Count Poller
//!
//! Watches the session and, while someone is signed in, refreshes the unread
//! notification and message counts: once immediately, then every
//! `poll_interval`. Timer ticks run one at a time inside the poller task; a
//! slow tick delays the next and missed ticks are skipped.
//!
//! On-demand refreshes run in the caller's task and can overlap timer ticks.
//! Every tick takes a sequence number when it starts, and a result that
//! completes after a later tick has been published is discarded, so a slow
//! tick can never overwrite fresher counts.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use hearth_core::{
    combine_counts, Identity, PollerConfig, Session, UnreadBoard, UnreadCountSource,
    UnreadSnapshot,
};

// ----------------------------------------------------------------------------
// Poller Core
// ----------------------------------------------------------------------------

/// State shared between the poller task and on-demand refreshes
struct PollerCore {
    source: Arc<dyn UnreadCountSource>,
    config: PollerConfig,
    board: Mutex<UnreadBoard>,
    snapshots: watch::Sender<UnreadSnapshot>,
}

impl PollerCore {
    fn board(&self) -> std::sync::MutexGuard<'_, UnreadBoard> {
        self.board
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run one poll tick for `identity` and return the published snapshot
    async fn tick(&self, identity: &Identity) -> UnreadSnapshot {
        let tick = self.board().begin_tick();
        debug!("Poll tick {} for {}", tick, identity.uid);

        let (notifications, messages) = futures::join!(
            self.source.unread_notification_count(identity),
            self.source.unread_message_count(identity),
        );

        if let Err(e) = &notifications {
            error!("Error fetching unread notification count: {}", e);
        }
        if let Err(e) = &messages {
            error!("Error fetching unread message count: {}", e);
        }

        let mut board = self.board();
        let previous = board.snapshot().counts;
        let counts = combine_counts(&notifications, &messages, self.config.fallback, previous);

        if board.complete_tick(tick, counts) {
            self.snapshots.send_replace(board.snapshot());
        } else {
            debug!("Discarding stale poll tick {}", tick);
        }
        board.snapshot()
    }

    fn reset(&self) {
        let snapshot = self.board().reset();
        self.snapshots.send_replace(snapshot);
    }

    async fn run(self: Arc<Self>, mut sessions: watch::Receiver<Session>) {
        loop {
            let identity = sessions.borrow_and_update().identity().cloned();

            let Some(identity) = identity else {
                if sessions.changed().await.is_err() {
                    break;
                }
                continue;
            };

            info!("Starting unread polling for {}", identity.uid);

            let mut ticker = interval(self.config.poll_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    changed = sessions.changed() => {
                        if changed.is_err() {
                            info!("Session provider closed, stopping unread polling");
                            return;
                        }
                        let same_user = sessions
                            .borrow()
                            .identity()
                            .is_some_and(|next| next.uid == identity.uid);
                        if !same_user {
                            break;
                        }
                        sessions.borrow_and_update();
                    }
                    _ = ticker.tick() => {
                        self.tick(&identity).await;
                    }
                }
            }

            // Counts never carry over to the next identity
            self.reset();
            info!("Stopped unread polling for {}", identity.uid);
        }
    }
}

// ----------------------------------------------------------------------------
// Poller Handle
// ----------------------------------------------------------------------------

/// Handle to a running unread-count poller.
///
/// Dropping the handle cancels the timer.
pub struct UnreadPoller {
    core: Arc<PollerCore>,
    sessions: watch::Receiver<Session>,
    task: Option<JoinHandle<()>>,
}

impl UnreadPoller {
    /// Start polling whenever `sessions` carries an identity
    pub fn spawn(
        source: Arc<dyn UnreadCountSource>,
        sessions: watch::Receiver<Session>,
        config: PollerConfig,
    ) -> Self {
        let (snapshots, _) = watch::channel(UnreadSnapshot::default());
        let core = Arc::new(PollerCore {
            source,
            config,
            board: Mutex::new(UnreadBoard::new()),
            snapshots,
        });

        let task = tokio::spawn(Arc::clone(&core).run(sessions.clone()));

        Self {
            core,
            sessions,
            task: Some(task),
        }
    }

    /// Receiver of every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<UnreadSnapshot> {
        self.core.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> UnreadSnapshot {
        *self.core.snapshots.borrow()
    }

    /// Run one out-of-band tick for the current identity.
    ///
    /// Returns `None` when nobody is signed in or the poller has been shut
    /// down.
    pub async fn refresh(&self) -> Option<UnreadSnapshot> {
        self.task.as_ref()?;
        let identity = self.sessions.borrow().identity().cloned()?;
        Some(self.core.tick(&identity).await)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the timer and stop watching the session
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Unread poller stopped");
        }
    }
}

impl Drop for UnreadPoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
