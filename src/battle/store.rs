//! Session store contract for active battles.
//!
//! The engine only needs point lookup, upsert and delete by id. Deployments
//! can back this with a TTL cache or an external store; expiry is the
//! backing store's concern.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use super::types::BattleSession;
use crate::error::BattleError;

type Result<T> = std::result::Result<T, BattleError>;

pub trait SessionStore: Send + Sync {
    /// Load a copy of a session by id.
    fn get(&self, id: &Uuid) -> Result<Option<BattleSession>>;

    /// Insert or replace a session.
    fn put(&self, session: BattleSession) -> Result<()>;

    /// Remove a session, returning it if it existed.
    fn delete(&self, id: &Uuid) -> Result<Option<BattleSession>>;
}

/// Process-local store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<Uuid, BattleSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: &Uuid) -> Result<Option<BattleSession>> {
        let sessions = self.sessions.lock().map_err(|_| BattleError::StorePoisoned)?;
        Ok(sessions.get(id).cloned())
    }

    fn put(&self, session: BattleSession) -> Result<()> {
        let mut sessions = self.sessions.lock().map_err(|_| BattleError::StorePoisoned)?;
        sessions.insert(session.id, session);
        Ok(())
    }

    fn delete(&self, id: &Uuid) -> Result<Option<BattleSession>> {
        let mut sessions = self.sessions.lock().map_err(|_| BattleError::StorePoisoned)?;
        Ok(sessions.remove(id))
    }
}
