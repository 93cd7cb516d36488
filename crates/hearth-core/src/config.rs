//! Centralized Configuration Management
//!
//! Configuration structures for the backend handles, the unread poller and the
//! notification feed, bundled in `HearthConfig`.

use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::{HearthError, HearthResult};
use crate::notifications::DEFAULT_NOTIFICATION_PAGE;
use crate::unread::FallbackPolicy;

// ----------------------------------------------------------------------------
// Backend Configuration
// ----------------------------------------------------------------------------

/// Connection settings for the managed backend project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    /// Analytics measurement id, optional
    #[serde(default)]
    pub measurement_id: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: "local-development-key".to_string(),
            auth_domain: "hearth-local.firebaseapp.com".to_string(),
            project_id: "hearth-local".to_string(),
            storage_bucket: "hearth-local.appspot.com".to_string(),
            messaging_sender_id: "000000000000".to_string(),
            app_id: "1:000000000000:web:local".to_string(),
            measurement_id: None,
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> HearthResult<()> {
        let required = [
            ("api_key", &self.api_key),
            ("auth_domain", &self.auth_domain),
            ("project_id", &self.project_id),
            ("storage_bucket", &self.storage_bucket),
            ("app_id", &self.app_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(HearthError::missing_field(field));
            }
        }

        if self.project_id.chars().any(char::is_whitespace) {
            return Err(HearthError::invalid_value(
                "project_id",
                "must not contain whitespace",
            ));
        }

        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Poller Configuration
// ----------------------------------------------------------------------------

/// Configuration for the unread-count poller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Period between poll ticks in milliseconds
    pub poll_interval_ms: u64,
    /// What to publish when a count query fails
    pub fallback: FallbackPolicy,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 30_000, // 30 seconds
            fallback: FallbackPolicy::ResetAll,
        }
    }
}

impl PollerConfig {
    /// Fast polling for tests
    pub fn testing() -> Self {
        Self {
            poll_interval_ms: 100,
            fallback: FallbackPolicy::ResetAll,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> HearthResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(HearthError::invalid_value(
                "poll_interval_ms",
                "poll interval cannot be zero",
            ));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Notification Configuration
// ----------------------------------------------------------------------------

/// Configuration for the notification feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Maximum notifications fetched per load
    pub page_size: usize,
    /// Whether loading the feed marks unread notifications as read
    pub mark_read_on_load: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_NOTIFICATION_PAGE,
            mark_read_on_load: true,
        }
    }
}

impl NotificationConfig {
    pub fn validate(&self) -> HearthResult<()> {
        if self.page_size == 0 {
            return Err(HearthError::invalid_value(
                "page_size",
                "page size cannot be zero",
            ));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Unified Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the client core
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl HearthConfig {
    /// Configuration tuned for tests: fast polling, defaults elsewhere
    pub fn testing() -> Self {
        Self {
            poller: PollerConfig::testing(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> HearthResult<()> {
        self.backend.validate()?;
        self.poller.validate()?;
        self.notifications.validate()?;
        Ok(())
    }
}
