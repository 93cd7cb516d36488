//! Main shell tabs
//!
//! Tab selection is ephemeral view state. It is never encoded in the URL and
//! is lost when the shell is rebuilt.

use serde::{Deserialize, Serialize};

use crate::unread::UnreadCounts;

// ----------------------------------------------------------------------------
// Tab Navigation
// ----------------------------------------------------------------------------

/// Sections of the main shell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Feed,
    Friends,
    Notifications,
    Messages,
    Profile,
}

impl Tab {
    pub const ALL: &'static [Tab] = &[
        Tab::Feed,
        Tab::Friends,
        Tab::Notifications,
        Tab::Messages,
        Tab::Profile,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Feed => "Feed",
            Tab::Friends => "Friends",
            Tab::Notifications => "Notifications",
            Tab::Messages => "Messages",
            Tab::Profile => "Profile",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }

    /// Unread badge shown next to this tab, if any
    pub fn badge(&self, unread: &UnreadCounts) -> Option<u64> {
        let count = match self {
            Tab::Notifications => unread.notifications,
            Tab::Messages => unread.messages,
            _ => return None,
        };
        (count > 0).then_some(count)
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .iter()
            .copied()
            .find(|tab| tab.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tab: {}", s))
    }
}

// ----------------------------------------------------------------------------
// Shell State
// ----------------------------------------------------------------------------

/// Local state of the main shell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellState {
    active_tab: Tab,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.next();
    }

    pub fn previous_tab(&mut self) {
        self.active_tab = self.active_tab.previous();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_wrap_around() {
        assert_eq!(Tab::Profile.next(), Tab::Feed);
        assert_eq!(Tab::Feed.previous(), Tab::Profile);
        assert_eq!(Tab::Friends.next(), Tab::Notifications);
    }

    #[test]
    fn shell_starts_on_feed() {
        let mut shell = ShellState::new();
        assert_eq!(shell.active_tab(), Tab::Feed);
        shell.select(Tab::Messages);
        shell.next_tab();
        assert_eq!(shell.active_tab(), Tab::Profile);
        shell.next_tab();
        shell.previous_tab();
        assert_eq!(shell.active_tab(), Tab::Profile);
    }

    #[test]
    fn badges_only_on_counted_tabs() {
        let unread = UnreadCounts::new(3, 0);
        assert_eq!(Tab::Notifications.badge(&unread), Some(3));
        assert_eq!(Tab::Messages.badge(&unread), None);
        assert_eq!(Tab::Feed.badge(&unread), None);
    }

    #[test]
    fn parses_tab_names_case_insensitively() {
        assert_eq!("messages".parse::<Tab>(), Ok(Tab::Messages));
        assert!("settings".parse::<Tab>().is_err());
    }
}
