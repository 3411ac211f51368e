//! Per-session conversation state.
//!
//! Every session owns its own [`ChatHistory`] behind an async mutex. The
//! relay holds that mutex for a whole exchange, so two requests on the same
//! session run one after the other and requests on different sessions never
//! see each other's turns.
//!
//! Session ids come from clients, so the store is bounded: once it holds
//! `limit` sessions, creating another evicts the least recently used one.

use super::history::ChatHistory;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Session used when a client does not name one.
pub const DEFAULT_SESSION: &str = "default";

pub const DEFAULT_MAX_SESSIONS: usize = 1000;

pub type SharedHistory = Arc<Mutex<ChatHistory>>;

#[derive(Debug)]
struct SessionEntry {
    history: SharedHistory,
    last_used: AtomicU64,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    clock: AtomicU64,
    limit: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
            limit: limit.max(1),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// History for `id`, created empty on first use.
    pub async fn get_or_create(&self, id: &str) -> SharedHistory {
        if let Some(entry) = self.sessions.read().await.get(id) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return entry.history.clone();
        }

        let mut sessions = self.sessions.write().await;
        // Another request may have created it while we waited.
        if let Some(entry) = sessions.get(id) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return entry.history.clone();
        }

        while sessions.len() >= self.limit {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::debug!(session = %oldest, "Evicted least recently used session");
        }

        let history = SharedHistory::default();
        sessions.insert(
            id.to_string(),
            SessionEntry {
                history: history.clone(),
                last_used: AtomicU64::new(self.tick()),
            },
        );
        history
    }

    pub async fn get(&self, id: &str) -> Option<SharedHistory> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|entry| entry.history.clone())
    }

    /// Drop the session from the store, handing back its history if it existed.
    pub async fn remove(&self, id: &str) -> Option<SharedHistory> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|entry| entry.history)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
