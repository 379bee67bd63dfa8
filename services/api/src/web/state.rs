//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-session chat state store.

use crate::config::Config;
use mindmate_core::ports::{ChartRenderingService, DatabaseService};
use mindmate_core::reply::ReplyStrategy;
use mindmate_core::session::ChatSession;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub replies: ReplyStrategy,
    pub charts: Arc<dyn ChartRenderingService>,
    pub sessions: Arc<SessionStore>,
}

//=========================================================================================
// SessionStore (One ChatSession per Browser Session)
//=========================================================================================

/// Identifies the chat session a request belongs to. Inserted by the session middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatSessionId(pub Uuid);

struct SessionSlot {
    session: Arc<Mutex<ChatSession>>,
    last_seen: Instant,
}

/// Holds every live chat session. Each session has its own lock so a slow
/// reply in one session never blocks another.
///
/// Sessions untouched for longer than `idle_timeout` are dropped, along with
/// their history, the next time the store is accessed.
pub struct SessionStore {
    sessions: Mutex<HashMap<ChatSessionId, SessionSlot>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn evict_idle(&self, sessions: &mut HashMap<ChatSessionId, SessionSlot>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, slot| now.duration_since(slot.last_seen) <= self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle chat session(s)", evicted);
        }
    }

    /// Returns the session for `id`, creating an empty one on first use.
    pub async fn get_or_create(&self, id: ChatSessionId) -> Arc<Mutex<ChatSession>> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions, now);

        let slot = sessions.entry(id).or_insert_with(|| SessionSlot {
            session: Arc::new(Mutex::new(ChatSession::new())),
            last_seen: now,
        });
        slot.last_seen = now;
        slot.session.clone()
    }

    /// Returns a live session without creating one.
    pub async fn get(&self, id: ChatSessionId) -> Option<Arc<Mutex<ChatSession>>> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions, now);

        sessions.get_mut(&id).map(|slot| {
            slot.last_seen = now;
            slot.session.clone()
        })
    }

    /// Ends a session, discarding its history. Returns whether it existed.
    pub async fn end(&self, id: ChatSessionId) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_id() -> ChatSessionId {
        ChatSessionId(Uuid::new_v4())
    }

    #[tokio::test]
    async fn sessions_are_reused_while_active() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = new_id();

        let first = store.get_or_create(id).await;
        first.lock().await.push_user("hello");
        let again = store.get_or_create(id).await;

        assert_eq!(again.lock().await.history.len(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_on_access() {
        let store = SessionStore::new(Duration::from_millis(100));
        let stale = new_id();
        for _ in 0..5 {
            store.get_or_create(new_id()).await;
        }
        store.get_or_create(stale).await;
        assert_eq!(store.len().await, 6);

        tokio::time::sleep(Duration::from_millis(250)).await;
        store.get_or_create(new_id()).await;

        assert_eq!(store.len().await, 1);
        assert!(store.get(stale).await.is_none());
    }

    #[tokio::test]
    async fn ended_sessions_are_gone() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = new_id();
        store.get_or_create(id).await;

        assert!(store.end(id).await);
        assert!(!store.end(id).await);
        assert!(store.get(id).await.is_none());
    }
}
