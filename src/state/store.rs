//! Round storage keyed by browser session.
//!
//! Entries expire a fixed time after their last write, mirroring the
//! session cookie max-age. Expired entries read as absent and are purged by
//! the background sweeper.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::types::{Round, SessionId};

/// Errors surfaced by a round store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Trait that all round store backends must implement
#[async_trait]
pub trait RoundStore: Send + Sync {
    /// Round of a session, None if the session has none or it expired
    async fn load(&self, session: &str, now: DateTime<Utc>) -> StoreResult<Option<Round>>;

    /// Write the round of a session, refreshing its expiry
    async fn save(&self, session: &str, round: Round, now: DateTime<Utc>) -> StoreResult<()>;

    async fn remove(&self, session: &str) -> StoreResult<()>;

    /// Drop every expired entry, returning how many were removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<usize>;
}

#[derive(Debug, Clone)]
struct StoredRound {
    round: Round,
    expires_at: DateTime<Utc>,
}

/// In-process store used by the server
#[derive(Debug)]
pub struct MemoryRoundStore {
    rounds: RwLock<HashMap<SessionId, StoredRound>>,
    ttl: Duration,
}

impl MemoryRoundStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            rounds: RwLock::new(HashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    pub async fn len(&self) -> usize {
        self.rounds.read().await.len()
    }
}

#[async_trait]
impl RoundStore for MemoryRoundStore {
    async fn load(&self, session: &str, now: DateTime<Utc>) -> StoreResult<Option<Round>> {
        let rounds = self.rounds.read().await;
        Ok(rounds
            .get(session)
            .filter(|stored| stored.expires_at > now)
            .map(|stored| stored.round.clone()))
    }

    async fn save(&self, session: &str, round: Round, now: DateTime<Utc>) -> StoreResult<()> {
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.rounds
            .write()
            .await
            .insert(session.to_string(), StoredRound { round, expires_at });
        Ok(())
    }

    async fn remove(&self, session: &str) -> StoreResult<()> {
        self.rounds.write().await.remove(session);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let mut rounds = self.rounds.write().await;
        let before = rounds.len();
        rounds.retain(|_, stored| stored.expires_at > now);
        Ok(before - rounds.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn running_round() -> Round {
        Round {
            running: true,
            ..Round::default()
        }
    }

    #[tokio::test]
    async fn test_load_missing_session() {
        let store = MemoryRoundStore::new(StdDuration::from_secs(60));
        assert_eq!(store.load("nobody", Utc::now()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemoryRoundStore::new(StdDuration::from_secs(60));
        let now = Utc::now();

        store.save("s1", running_round(), now).await.unwrap();

        let loaded = store.load("s1", now).await.unwrap();
        assert_eq!(loaded, Some(running_round()));
        assert_eq!(store.load("s2", now).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let store = MemoryRoundStore::new(StdDuration::from_secs(60));
        let now = Utc::now();
        store.save("s1", running_round(), now).await.unwrap();

        let later = now + Duration::seconds(61);
        assert_eq!(store.load("s1", later).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_refreshes_expiry() {
        let store = MemoryRoundStore::new(StdDuration::from_secs(60));
        let now = Utc::now();
        store.save("s1", Round::default(), now).await.unwrap();
        store
            .save("s1", running_round(), now + Duration::seconds(50))
            .await
            .unwrap();

        let later = now + Duration::seconds(100);
        assert_eq!(store.load("s1", later).await.unwrap(), Some(running_round()));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = MemoryRoundStore::new(StdDuration::from_secs(60));
        let now = Utc::now();
        store.save("old", Round::default(), now).await.unwrap();
        store
            .save("fresh", Round::default(), now + Duration::seconds(45))
            .await
            .unwrap();

        let removed = store
            .purge_expired(now + Duration::seconds(70))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryRoundStore::new(StdDuration::from_secs(60));
        let now = Utc::now();
        store.save("s1", Round::default(), now).await.unwrap();
        store.remove("s1").await.unwrap();
        assert_eq!(store.load("s1", now).await.unwrap(), None);
    }
}
