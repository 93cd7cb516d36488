//! Runtime Builder API
//!
//! Lets the CLI and tests assemble an `AppRuntime` from a backend client,
//! overriding the clock or topic table where they need to.

use std::sync::Arc;

use tracing::info;

use hearth_core::{
    BackendClient, HearthConfig, HearthResult, Router, ShellState, SystemTimeSource, TimeSource,
    TopicTable,
};

use crate::notifications::NotificationFeed;
use crate::poller::UnreadPoller;
use crate::runtime::AppRuntime;
use crate::session::SessionProvider;

// ----------------------------------------------------------------------------
// Runtime Builder
// ----------------------------------------------------------------------------

/// Builder for a running Hearth client
pub struct RuntimeBuilder {
    backend: BackendClient,
    config: HearthConfig,
    clock: Arc<dyn TimeSource>,
    topics: Option<TopicTable>,
}

impl RuntimeBuilder {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            config: HearthConfig::default(),
            clock: Arc::new(SystemTimeSource),
            topics: None,
        }
    }

    pub fn with_config(mut self, config: HearthConfig) -> Self {
        self.config = config;
        self
    }

    /// Clock used for relative notification times
    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the built-in trending topics
    pub fn with_topics(mut self, topics: TopicTable) -> Self {
        self.topics = Some(topics);
        self
    }

    /// Validate the configuration, then start the session provider and poller.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> HearthResult<AppRuntime> {
        self.config.poller.validate()?;
        self.config.notifications.validate()?;

        let topics = match self.topics {
            Some(topics) => topics,
            None => TopicTable::new(hearth_core::TRENDING_TOPICS)?,
        };

        let session = SessionProvider::start(self.backend.auth());
        let poller = UnreadPoller::spawn(
            self.backend.unread_counts(),
            session.subscribe(),
            self.config.poller.clone(),
        );
        let feed = NotificationFeed::new(
            self.backend.documents(),
            self.config.notifications.clone(),
            self.clock,
        );

        info!(
            "Hearth runtime started (poll interval {}ms)",
            self.config.poller.poll_interval_ms
        );

        Ok(AppRuntime::from_parts(
            self.backend,
            session,
            poller,
            feed,
            Router::new(topics),
            ShellState::new(),
        ))
    }
}
