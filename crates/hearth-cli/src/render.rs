//! Plain-text rendering of Hearth views
//!
//! Every function returns a `String` so command handlers stay trivial and the
//! output can be asserted on directly.

use std::fmt::Write;

use hearth_core::{
    Navigation, NotificationEntry, ShellState, Tab, TopicTable, TopicView, UnreadCounts,
    UnreadSnapshot, View,
};

/// Render the view a navigation landed on
pub fn navigation(navigation: &Navigation, shell: &ShellState, unread: &UnreadCounts) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "path: {}", navigation.path);
    if navigation.redirects > 0 {
        let _ = writeln!(out, "redirects: {}", navigation.redirects);
    }

    let body = match &navigation.view {
        View::Loading => "Loading...\n".to_string(),
        View::SignIn => sign_in(),
        View::Shell => tab_bar(shell, unread),
        View::Topic(view) => topic(view),
    };
    out.push_str(&body);
    out
}

fn sign_in() -> String {
    "Sign in to Hearth\n  email:    ____\n  password: ____\n".to_string()
}

/// Tab titles with unread badges; the active tab is bracketed
pub fn tab_bar(shell: &ShellState, unread: &UnreadCounts) -> String {
    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|tab| {
            let mut label = tab.title().to_string();
            if let Some(count) = tab.badge(unread) {
                let _ = write!(label, " ({})", count);
            }
            if *tab == shell.active_tab() {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect();
    format!("{}\n", tabs.join(" | "))
}

pub fn topic(view: &TopicView) -> String {
    match view {
        TopicView::Found {
            tag,
            description,
            post_count,
            placeholders,
            back_link,
        } => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", tag);
            let _ = writeln!(out, "{}", description);
            let _ = writeln!(out, "{} posts", post_count);
            for line in placeholders {
                let _ = writeln!(out, "  {}", line);
            }
            let _ = writeln!(out, "<- back to {}", back_link);
            out
        }
        TopicView::NotFound { back_link } => {
            format!("Topic not found\n<- back to {}\n", back_link)
        }
    }
}

/// Trending table with each topic's route
pub fn topics(table: &TopicTable) -> String {
    let mut out = String::from("Trending Topics\n");
    for topic in table.topics() {
        let _ = writeln!(
            out,
            "  {:<16} {:>5} posts  {}",
            topic.tag,
            topic.post_count,
            topic.path()
        );
    }
    out
}

pub fn snapshot(snapshot: &UnreadSnapshot) -> String {
    format!(
        "tick {}: {} notifications, {} messages",
        snapshot.tick, snapshot.counts.notifications, snapshot.counts.messages
    )
}

pub fn notifications(entries: &[NotificationEntry]) -> String {
    if entries.is_empty() {
        return "No notifications yet\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let marker = if entry.was_unread { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} ({}) {} {}  [{}] {}",
            marker,
            entry.avatar_initial,
            entry.actor_name,
            entry.content,
            entry.kind.label(),
            entry.time_ago
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{NotificationId, NotificationKind};

    #[test]
    fn tab_bar_marks_active_tab_and_badges() {
        let mut shell = ShellState::new();
        shell.select(Tab::Messages);
        let bar = tab_bar(&shell, &UnreadCounts::new(3, 0));
        assert_eq!(
            bar,
            "Feed | Friends | Notifications (3) | [Messages] | Profile\n"
        );
    }

    #[test]
    fn topic_page_shows_details() {
        let table = TopicTable::trending();
        let rendered = topic(&table.resolve("ai"));
        assert!(rendered.starts_with("#AI\n"));
        assert!(rendered.contains(
            "Artificial Intelligence is a hot topic with trends, tools, and innovations."
        ));
        assert!(rendered.contains("331 posts"));
    }

    #[test]
    fn missing_topic_shows_empty_state() {
        let rendered = topic(&TopicTable::trending().resolve("nonexistent"));
        assert_eq!(rendered, "Topic not found\n<- back to /\n");
    }

    #[test]
    fn topic_list_includes_routes() {
        let rendered = topics(&TopicTable::trending());
        assert!(rendered.contains("/topic/webdevelopment"));
        assert!(rendered.contains("/topic/ai"));
        assert_eq!(rendered.lines().count(), 6);
    }

    #[test]
    fn notification_rows() {
        let entries = vec![NotificationEntry {
            id: NotificationId::new(),
            kind: NotificationKind::Like,
            actor_name: "Alan Turing".to_string(),
            avatar_initial: "A".to_string(),
            content: "liked your post".to_string(),
            time_ago: "1m ago".to_string(),
            was_unread: true,
        }];
        assert_eq!(
            notifications(&entries),
            "* (A) Alan Turing liked your post  [like] 1m ago\n"
        );
        assert_eq!(notifications(&[]), "No notifications yet\n");
    }
}
