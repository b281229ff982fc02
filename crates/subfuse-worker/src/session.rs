//! In-memory session store.

use std::collections::HashMap;
use std::sync::Mutex;

use subfuse_models::{PendingUpload, Session, UserId};

/// Thread-safe map of per-user sessions.
///
/// Sessions are created lazily with defaults and kept for the process
/// lifetime. All mutation goes through `update` so callers can never hold a
/// reference across the lock.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of the user's session, creating it on first contact.
    pub fn get_or_create(&self, user: UserId) -> Session {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.entry(user).or_default().clone()
    }

    /// Mutate the user's session under the lock.
    pub fn update<R>(&self, user: UserId, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        f(sessions.entry(user).or_default())
    }

    /// True if any upload is pending for the user.
    pub fn workflow_active(&self, user: UserId) -> bool {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(&user)
            .is_some_and(|s| s.pending != PendingUpload::None)
    }

    /// Clear whichever upload the user was waiting for.
    pub fn clear_pending(&self, user: UserId) {
        self.update(user, |s| s.pending = PendingUpload::None);
    }
}
