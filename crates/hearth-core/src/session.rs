//! Session state for the signed-in user
//!
//! A `Session` starts out loading with no identity. The first auth-state event
//! resolves it and `loading` never becomes true again for the lifetime of the
//! value.

use serde::{Deserialize, Serialize};

use crate::types::Identity;

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// Current authenticated identity plus the initial-resolution flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    identity: Option<Identity>,
    loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}

impl Session {
    /// Session at process start: loading, nobody signed in
    pub fn initial() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }

    /// A resolved session, mostly for tests and fixtures
    pub fn resolved(identity: Option<Identity>) -> Self {
        Self {
            identity,
            loading: false,
        }
    }

    /// Apply one auth-state event: overwrite the identity and mark resolved
    pub fn apply_auth_event(&mut self, identity: Option<Identity>) {
        self.identity = identity;
        self.loading = false;
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_session_is_loading_and_anonymous() {
        let session = Session::initial();
        assert!(session.is_loading());
        assert!(session.identity().is_none());
    }

    #[test]
    fn loading_never_returns_after_resolution() {
        let mut session = Session::initial();
        session.apply_auth_event(Some(Identity::new("u1")));
        assert!(!session.is_loading());
        session.apply_auth_event(None);
        assert!(!session.is_loading());
        assert!(!session.is_signed_in());
        session.apply_auth_event(Some(Identity::new("u2")));
        assert!(!session.is_loading());
        assert_eq!(session.identity().map(|i| i.uid.as_str()), Some("u2"));
    }
}
