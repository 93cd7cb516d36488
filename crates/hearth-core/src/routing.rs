//! Client-side routing and auth guards
//!
//! `Router::resolve` maps a path plus the current session to either a view or
//! a redirect. It is a pure function: nothing here touches the backend.
//!
//! Route table:
//! - `/` → main shell (sign-in view when nobody is signed in)
//! - `/topic/:slug` → topic page, signed-in users only
//! - anything else → redirect to `/`
//!
//! While the session is still loading every route renders the loading view,
//! so a signed-in user never sees a redirect flash during auth resolution.

use crate::session::Session;
use crate::topics::{TopicTable, TopicView};

/// Root path of the main shell
pub const HOME_PATH: &str = "/";

const MAX_REDIRECTS: usize = 4;

// ----------------------------------------------------------------------------
// Routes
// ----------------------------------------------------------------------------

/// Parsed route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Topic { slug: String },
    Unknown,
}

/// Drop query and fragment, collapse repeated and trailing slashes
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["topic", slug] => Route::Topic {
                slug: (*slug).to_string(),
            },
            _ => Route::Unknown,
        }
    }
}

// ----------------------------------------------------------------------------
// Views
// ----------------------------------------------------------------------------

/// View rendered for a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Spinner shown during the initial auth resolution
    Loading,
    /// Sign-in / sign-up page
    SignIn,
    /// Main tabbed shell
    Shell,
    Topic(TopicView),
}

/// Result of resolving one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Render(View),
    /// Replace the current location with this path
    Redirect(String),
}

/// Final location after following redirects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub view: View,
    pub redirects: usize,
}

// ----------------------------------------------------------------------------
// Router
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Router {
    topics: TopicTable,
}

impl Router {
    pub fn new(topics: TopicTable) -> Self {
        Self { topics }
    }

    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    pub fn resolve(&self, path: &str, session: &Session) -> RouteOutcome {
        match Route::parse(path) {
            Route::Unknown => RouteOutcome::Redirect(HOME_PATH.to_string()),
            _ if session.is_loading() => RouteOutcome::Render(View::Loading),
            Route::Home => match session.identity() {
                Some(_) => RouteOutcome::Render(View::Shell),
                None => RouteOutcome::Render(View::SignIn),
            },
            Route::Topic { slug } => match session.identity() {
                Some(_) => RouteOutcome::Render(View::Topic(self.topics.resolve(&slug))),
                None => RouteOutcome::Redirect(HOME_PATH.to_string()),
            },
        }
    }

    /// Resolve `path`, following redirects until a view renders
    pub fn navigate(&self, path: &str, session: &Session) -> Navigation {
        let mut current = normalize_path(path);

        for redirects in 0..=MAX_REDIRECTS {
            match self.resolve(&current, session) {
                RouteOutcome::Render(view) => {
                    return Navigation {
                        path: current,
                        view,
                        redirects,
                    }
                }
                RouteOutcome::Redirect(target) => {
                    tracing::debug!("Redirecting {} -> {}", current, target);
                    current = target;
                }
            }
        }

        // Every redirect targets `/`, which always renders; this is unreachable
        // in practice but keeps navigation total.
        Navigation {
            path: HOME_PATH.to_string(),
            view: View::Loading,
            redirects: MAX_REDIRECTS,
        }
    }
}
