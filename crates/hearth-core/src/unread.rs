//! Unread badge counts
//!
//! Pure pieces of the unread-count poller: the wire shape returned by the two
//! count queries, the fallback rules that turn a pair of query results into
//! `UnreadCounts`, and the tick-ordered board that decides which result gets
//! published.

use serde::{Deserialize, Serialize};

use crate::errors::HearthResult;

// ----------------------------------------------------------------------------
// Wire Shape
// ----------------------------------------------------------------------------

/// Response of an unread-count query: `{ "count": integer | null }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    #[serde(default)]
    pub count: Option<i64>,
}

impl CountResponse {
    pub fn new(count: i64) -> Self {
        Self { count: Some(count) }
    }

    /// Missing and negative counts read as zero
    pub fn value(&self) -> u64 {
        self.count.map(|c| c.max(0) as u64).unwrap_or(0)
    }
}

// ----------------------------------------------------------------------------
// Unread Counts
// ----------------------------------------------------------------------------

/// Badge counts shown in the navigation bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCounts {
    pub notifications: u64,
    pub messages: u64,
}

impl UnreadCounts {
    pub fn new(notifications: u64, messages: u64) -> Self {
        Self {
            notifications,
            messages,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.notifications.saturating_add(self.messages)
    }
}

/// What to publish when one of the two count queries fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Any failure resets both counts to zero
    #[default]
    ResetAll,
    /// A failed field keeps its last known good value, the other updates
    KeepLastKnown,
}

/// Combine the two query results into one set of counts.
///
/// Under `ResetAll` a single failure zeroes both fields even if the other
/// query succeeded. `previous` is only consulted under `KeepLastKnown`.
pub fn combine_counts(
    notifications: &HearthResult<CountResponse>,
    messages: &HearthResult<CountResponse>,
    policy: FallbackPolicy,
    previous: UnreadCounts,
) -> UnreadCounts {
    match policy {
        FallbackPolicy::ResetAll => match (notifications, messages) {
            (Ok(n), Ok(m)) => UnreadCounts::new(n.value(), m.value()),
            _ => UnreadCounts::zero(),
        },
        FallbackPolicy::KeepLastKnown => UnreadCounts {
            notifications: notifications
                .as_ref()
                .map(CountResponse::value)
                .unwrap_or(previous.notifications),
            messages: messages
                .as_ref()
                .map(CountResponse::value)
                .unwrap_or(previous.messages),
        },
    }
}

// ----------------------------------------------------------------------------
// Tick-Ordered Board
// ----------------------------------------------------------------------------

/// Published counts stamped with the tick that produced them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadSnapshot {
    pub counts: UnreadCounts,
    /// Sequence number of the producing tick; 0 means nothing fetched yet
    pub tick: u64,
}

/// Hands out tick numbers and keeps only the freshest completed result.
///
/// Ticks are numbered when they start. A tick that completes after a
/// later-started tick has already been published is discarded.
#[derive(Debug, Default)]
pub struct UnreadBoard {
    next_tick: u64,
    current: UnreadSnapshot,
}

impl UnreadBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the sequence number for a tick that is about to start
    pub fn begin_tick(&mut self) -> u64 {
        self.next_tick += 1;
        self.next_tick
    }

    /// Record a completed tick. Returns false if it was stale and dropped.
    pub fn complete_tick(&mut self, tick: u64, counts: UnreadCounts) -> bool {
        if tick <= self.current.tick {
            return false;
        }
        self.current = UnreadSnapshot { counts, tick };
        true
    }

    /// Zero the counts (sign-out). Ticks still in flight become stale.
    pub fn reset(&mut self) -> UnreadSnapshot {
        let tick = self.begin_tick();
        self.current = UnreadSnapshot {
            counts: UnreadCounts::zero(),
            tick,
        };
        self.current
    }

    pub fn snapshot(&self) -> UnreadSnapshot {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HearthError;

    #[test]
    fn count_response_treats_missing_and_negative_as_zero() {
        assert_eq!(CountResponse::default().value(), 0);
        assert_eq!(CountResponse::new(-3).value(), 0);
        assert_eq!(CountResponse::new(12).value(), 12);
    }

    #[test]
    fn count_response_parses_null_and_absent_count() {
        let null: CountResponse = serde_json::from_str(r#"{"count":null}"#).unwrap();
        let absent: CountResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(null.value(), 0);
        assert_eq!(absent.value(), 0);
    }

    #[test]
    fn reset_all_discards_partial_success() {
        let notifications = Err(HearthError::unavailable("offline"));
        let messages = Ok(CountResponse::new(5));
        let counts = combine_counts(
            &notifications,
            &messages,
            FallbackPolicy::ResetAll,
            UnreadCounts::new(3, 4),
        );
        assert_eq!(counts, UnreadCounts::new(0, 0));
    }

    #[test]
    fn keep_last_known_is_per_field() {
        let notifications = Err(HearthError::unavailable("offline"));
        let messages = Ok(CountResponse::new(5));
        let counts = combine_counts(
            &notifications,
            &messages,
            FallbackPolicy::KeepLastKnown,
            UnreadCounts::new(3, 4),
        );
        assert_eq!(counts, UnreadCounts::new(3, 5));
    }

    #[test]
    fn later_tick_wins_over_slow_earlier_tick() {
        let mut board = UnreadBoard::new();
        let a = board.begin_tick();
        let b = board.begin_tick();

        assert!(board.complete_tick(b, UnreadCounts::new(2, 2)));
        assert!(!board.complete_tick(a, UnreadCounts::new(9, 9)));
        assert_eq!(board.snapshot().counts, UnreadCounts::new(2, 2));
        assert_eq!(board.snapshot().tick, b);
    }

    #[test]
    fn reset_invalidates_in_flight_ticks() {
        let mut board = UnreadBoard::new();
        let tick = board.begin_tick();
        board.reset();
        assert!(!board.complete_tick(tick, UnreadCounts::new(1, 1)));
        assert_eq!(board.snapshot().counts, UnreadCounts::zero());
    }
}
