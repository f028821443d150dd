//! Bearer-token sessions

use crate::StorageError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Sessions expire after a day unless configured otherwise
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(86_400);

#[derive(Debug, Clone)]
struct Session {
    user_id: i64,
    issued_at: Instant,
}

/// Maps opaque session tokens to user ids
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a new token for a user
    pub fn create(&self, user_id: i64) -> Result<String, StorageError> {
        let token = Uuid::new_v4().simple().to_string();
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        sessions.insert(
            token.clone(),
            Session {
                user_id,
                issued_at: Instant::now(),
            },
        );
        debug!("Issued session for user {}", user_id);
        Ok(token)
    }

    /// Resolve a token to its user id, evicting it if expired
    pub fn resolve(&self, token: &str) -> Result<Option<i64>, StorageError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        match sessions.get(token) {
            Some(session) if session.issued_at.elapsed() < self.ttl => Ok(Some(session.user_id)),
            Some(_) => {
                sessions.remove(token);
                debug!("Evicted expired session");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Revoke a token; returns whether it existed
    pub fn revoke(&self, token: &str) -> Result<bool, StorageError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(sessions.remove(token).is_some())
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, StorageError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, s| s.issued_at.elapsed() < ttl);
        Ok(before - sessions.len())
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        self.sessions
            .lock()
            .map(|s| s.len())
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}
