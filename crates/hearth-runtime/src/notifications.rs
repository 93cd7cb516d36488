//! Notification feed loader
//!
//! Fetches the newest notifications for the signed-in user, turns them into
//! display entries, and marks the unread ones as read in a single batch.

use std::sync::Arc;

use tracing::{debug, warn};

use hearth_core::{
    DocumentStore, HearthResult, Identity, NotificationConfig, NotificationEntry, NotificationId,
    TimeSource,
};

/// Loads the notifications page for one user
pub struct NotificationFeed {
    documents: Arc<dyn DocumentStore>,
    config: NotificationConfig,
    clock: Arc<dyn TimeSource>,
}

impl NotificationFeed {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        config: NotificationConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            documents,
            config,
            clock,
        }
    }

    /// Load up to `page_size` notifications, newest first.
    ///
    /// Entries keep the read state they had when fetched. A failed mark-read
    /// batch is logged and does not fail the load.
    pub async fn load(&self, identity: &Identity) -> HearthResult<Vec<NotificationEntry>> {
        let mut notifications = self
            .documents
            .recent_notifications(identity, self.config.page_size)
            .await?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(self.config.page_size);

        let now = self.clock.now();
        let entries: Vec<NotificationEntry> = notifications
            .iter()
            .map(|n| NotificationEntry::from_notification(n, now))
            .collect();

        let unread: Vec<NotificationId> = notifications
            .iter()
            .filter(|n| !n.is_read)
            .map(|n| n.id)
            .collect();

        if self.config.mark_read_on_load && !unread.is_empty() {
            debug!("Marking {} notifications read for {}", unread.len(), identity.uid);
            if let Err(e) = self.documents.mark_notifications_read(&unread).await {
                warn!("Failed to mark notifications read: {}", e);
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{FixedTimeSource, HearthError, Timestamp};
    use hearth_harness::{Fixture, MemoryBackend, Operation};

    const NOW: u64 = 1_700_000_000_000;

    fn feed(backend: &Arc<MemoryBackend>, config: NotificationConfig) -> NotificationFeed {
        NotificationFeed::new(
            backend.clone(),
            config,
            Arc::new(FixedTimeSource(Timestamp::new(NOW))),
        )
    }

    fn demo_backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::from_fixture(Fixture::demo(Timestamp::new(NOW))))
    }

    #[tokio::test]
    async fn loads_newest_first_and_marks_unread() {
        let backend = demo_backend();
        let ada = Identity::new("ada");
        let entries = feed(&backend, NotificationConfig::default())
            .load(&ada)
            .await
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].actor_name, "Alan Turing");
        assert_eq!(entries[0].time_ago, "1m ago");
        assert!(entries[0].was_unread);
        assert_eq!(entries[1].time_ago, "3h ago");
        assert_eq!(entries[2].time_ago, "2d ago");
        assert!(!entries[2].was_unread);

        assert_eq!(backend.call_count(Operation::MarkRead), 1);
        let stored = backend.notifications_for(&ada.uid).await;
        assert!(stored.iter().all(|n| n.is_read));
    }

    #[tokio::test]
    async fn nothing_unread_skips_the_batch() {
        let backend = demo_backend();
        let grace = Identity::new("grace");
        let entries = feed(&backend, NotificationConfig::default())
            .load(&grace)
            .await
            .unwrap();

        assert!(entries.is_empty());
        assert_eq!(backend.call_count(Operation::MarkRead), 0);
    }

    #[tokio::test]
    async fn page_size_limits_the_list() {
        let backend = demo_backend();
        let config = NotificationConfig {
            page_size: 1,
            ..NotificationConfig::default()
        };
        let entries = feed(&backend, config)
            .load(&Identity::new("ada"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn mark_read_failure_still_returns_entries() {
        let backend = demo_backend();
        backend.set_failing(Operation::MarkRead, HearthError::permission_denied("update"));

        let entries = feed(&backend, NotificationConfig::default())
            .load(&Identity::new("ada"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn load_failure_propagates() {
        let backend = demo_backend();
        backend.set_failing(
            Operation::RecentNotifications,
            HearthError::unavailable("offline"),
        );

        let result = feed(&backend, NotificationConfig::default())
            .load(&Identity::new("ada"))
            .await;
        assert_eq!(result.unwrap_err(), HearthError::unavailable("offline"));
        assert_eq!(backend.call_count(Operation::MarkRead), 0);
    }

    #[tokio::test]
    async fn read_only_mode_leaves_state_alone() {
        let backend = demo_backend();
        let config = NotificationConfig {
            mark_read_on_load: false,
            ..NotificationConfig::default()
        };
        feed(&backend, config)
            .load(&Identity::new("ada"))
            .await
            .unwrap();
        assert_eq!(backend.call_count(Operation::MarkRead), 0);
    }
}
