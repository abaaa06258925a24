//! Session handle holding the bearer access token.
//!
//! An explicit, cloneable handle rather than process-global state, so tests
//! and multiple concurrent sessions stay isolated. Writers are the auth flow
//! (login/signup set, logout clears) and the 401 handler (clears).

use std::sync::{Arc, PoisonError, RwLock};

/// Shared access-token holder. Clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if a user is logged in.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store a token after a successful login/signup.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Drop the token (logout, or a 401 from the server).
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
