//! Trending topics and the topic resolver
//!
//! One static table backs both the feed sidebar and the `/topic/:slug` view.
//! Topics are looked up by slug, a pure function of the tag.

use serde::Serialize;

use crate::errors::{HearthError, HearthResult};

// ----------------------------------------------------------------------------
// Slugs
// ----------------------------------------------------------------------------

/// Normalize a tag into its URL slug.
///
/// Every `#` is removed, the rest is lowercased, and each run of whitespace
/// becomes a single `-`. Applying it twice gives the same result as once.
pub fn slugify(tag: &str) -> String {
    let lowered = tag.replace('#', "").to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }

    slug
}

// ----------------------------------------------------------------------------
// Topic Table
// ----------------------------------------------------------------------------

/// A trending topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub tag: &'static str,
    pub post_count: u32,
    pub description: &'static str,
}

impl Topic {
    pub fn slug(&self) -> String {
        slugify(self.tag)
    }

    /// Route that shows this topic
    pub fn path(&self) -> String {
        format!("/topic/{}", self.slug())
    }
}

/// Topics shown in the feed sidebar
pub const TRENDING_TOPICS: &[Topic] = &[
    Topic {
        tag: "#WebDevelopment",
        post_count: 357,
        description:
            "People are actively discussing web design, frameworks, and new technologies.",
    },
    Topic {
        tag: "#ReactJS",
        post_count: 216,
        description: "Developers are sharing tips, projects, and tutorials about React.",
    },
    Topic {
        tag: "#AI",
        post_count: 331,
        description: "Artificial Intelligence is a hot topic with trends, tools, and innovations.",
    },
    Topic {
        tag: "#Design",
        post_count: 232,
        description: "Creative discussions on UI/UX and graphic design.",
    },
    Topic {
        tag: "#Technology",
        post_count: 513,
        description:
            "The most popular topic covering everything from gadgets to futuristic tech.",
    },
];

/// Read-only topic table with slugs checked for collisions
#[derive(Debug, Clone)]
pub struct TopicTable {
    topics: &'static [Topic],
}

impl TopicTable {
    /// Build a table, rejecting two tags that normalize to the same slug
    pub fn new(topics: &'static [Topic]) -> HearthResult<Self> {
        for (i, topic) in topics.iter().enumerate() {
            let slug = topic.slug();
            if let Some(earlier) = topics[..i].iter().find(|t| t.slug() == slug) {
                return Err(HearthError::DuplicateTopicSlug {
                    slug,
                    first: earlier.tag.to_string(),
                    second: topic.tag.to_string(),
                });
            }
        }
        Ok(Self { topics })
    }

    /// The shared trending table
    pub fn trending() -> Self {
        // Checked by `trending_table_has_unique_slugs`
        Self {
            topics: TRENDING_TOPICS,
        }
    }

    pub fn topics(&self) -> &'static [Topic] {
        self.topics
    }

    /// First topic whose slugified tag equals `slug`
    pub fn find(&self, slug: &str) -> Option<&'static Topic> {
        self.topics.iter().find(|topic| topic.slug() == slug)
    }

    /// Resolve a route slug into the topic page view model
    pub fn resolve(&self, slug: &str) -> TopicView {
        match self.find(slug) {
            Some(topic) => TopicView::found(topic),
            None => TopicView::NotFound {
                back_link: "/".to_string(),
            },
        }
    }
}

impl Default for TopicTable {
    fn default() -> Self {
        Self::trending()
    }
}

// ----------------------------------------------------------------------------
// Topic View
// ----------------------------------------------------------------------------

/// What the topic page renders. Presentational only, never hits the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicView {
    Found {
        tag: String,
        description: String,
        post_count: u32,
        placeholders: [String; 2],
        back_link: String,
    },
    NotFound {
        back_link: String,
    },
}

impl TopicView {
    fn found(topic: &Topic) -> Self {
        TopicView::Found {
            tag: topic.tag.to_string(),
            description: topic.description.to_string(),
            post_count: topic.post_count,
            placeholders: [
                format!("Posts related to {} will appear here.", topic.tag),
                "You can extend this page to query the document store for tagged posts."
                    .to_string(),
            ],
            back_link: "/".to_string(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, TopicView::Found { .. })
    }
}
