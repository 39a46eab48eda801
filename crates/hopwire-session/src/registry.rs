//! Process-wide session registry.
//!
//! Writes only happen at handshake time; the common case is concurrent
//! reads from dispatcher tasks performing trial-decrypt session discovery,
//! so lookups use a shared lock and only `insert` takes the exclusive one.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::session::{Session, SessionId};

/// Registry of live sessions, keyed by `session_id`.
///
/// This design never explicitly removes a session - lifetime is process
/// lifetime, per `spec.md`'s invariant 4. Idle-expiry is a documented
/// extension point, not implemented here.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, session: Arc<Session>) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.session_id, session);
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Clone out the current set of sessions for trial-decrypt iteration.
    /// Cloning the `Arc`s up front lets the caller attempt AEAD decryption
    /// against each session without holding the registry lock.
    pub async fn snapshot(&self) -> Vec<Arc<Session>> {
        self.sessions.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let registry = SessionRegistry::new();
        let session = Arc::new(Session::new(SessionId::generate(), [1u8; 32]));
        let id = session.session_id;
        registry.insert(session).await;
        assert!(registry.get(&id).await.is_some());
    }

    #[tokio::test]
    async fn unknown_id_returns_none() {
        let registry = SessionRegistry::new();
        assert!(registry.get(&SessionId::generate()).await.is_none());
    }

    #[tokio::test]
    async fn snapshot_reflects_all_inserted_sessions() {
        let registry = SessionRegistry::new();
        for _ in 0..3 {
            registry
                .insert(Arc::new(Session::new(SessionId::generate(), [2u8; 32])))
                .await;
        }
        assert_eq!(registry.snapshot().await.len(), 3);
        assert_eq!(registry.len().await, 3);
    }
}
