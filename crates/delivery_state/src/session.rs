//! Per-session state: pending confirmations and handling locks

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::identifier::Identifier;

/// A chat conversation. Telegram chat ids are signed 64-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identifier shown to a session and waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub session: SessionId,
    pub identifier: Identifier,
}

/// Registry of pending confirmations, at most one per session.
#[async_trait]
pub trait PendingStore: Send + Sync {
    async fn get(&self, session: SessionId) -> Option<PendingConfirmation>;

    /// Insert or replace the session's pending confirmation.
    async fn put(&self, pending: PendingConfirmation);

    async fn remove(&self, session: SessionId) -> Option<PendingConfirmation>;
}

/// Process-local registry. Lost on restart; entries never expire.
#[derive(Debug, Default)]
pub struct InMemoryPendingStore {
    entries: DashMap<SessionId, PendingConfirmation>,
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PendingStore for InMemoryPendingStore {
    async fn get(&self, session: SessionId) -> Option<PendingConfirmation> {
        self.entries.get(&session).map(|entry| entry.value().clone())
    }

    async fn put(&self, pending: PendingConfirmation) {
        self.entries.insert(pending.session, pending);
    }

    async fn remove(&self, session: SessionId) -> Option<PendingConfirmation> {
        self.entries.remove(&session).map(|(_, pending)| pending)
    }
}

/// One async mutex per session so events of the same chat are handled one
/// at a time while different chats proceed in parallel.
///
/// A session's entry is dropped when its last holder releases it, so the map
/// only holds chats with an event in flight.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, session: SessionId) -> SessionGuard<'_> {
        // Clone the Arc out before awaiting so no DashMap shard guard is held
        // across the await.
        let lock = self
            .locks
            .entry(session)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        SessionGuard {
            locks: &self.locks,
            session,
            _guard: lock.lock_owned().await,
        }
    }

    /// Sessions currently holding or waiting for their lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive hold on one session, released on drop.
pub struct SessionGuard<'a> {
    locks: &'a DashMap<SessionId, Arc<Mutex<()>>>,
    session: SessionId,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Two references left means the map's and ours: nobody is waiting.
        // Cloning happens under the same shard lock, so no waiter can slip in.
        self.locks
            .remove_if(&self.session, |_, lock| Arc::strong_count(lock) == 2);
    }
}
