mod play;
mod round;
pub mod store;

pub use play::PageVisit;

use chrono::Utc;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::types::*;
use crate::words::WordBank;
use store::{MemoryRoundStore, RoundStore, StoreResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Card set, read-only after startup
    pub words: Arc<WordBank>,
    /// Per-session round records
    pub rounds: Arc<dyn RoundStore>,
}

impl AppState {
    /// State backed by the in-memory store, with entries living as long as
    /// the session cookie
    pub fn new(config: AppConfig, words: WordBank) -> Self {
        let store = MemoryRoundStore::new(config.cookie_max_age);
        Self::with_store(config, words, Arc::new(store))
    }

    pub fn with_store(config: AppConfig, words: WordBank, rounds: Arc<dyn RoundStore>) -> Self {
        Self {
            config,
            words: Arc::new(words),
            rounds,
        }
    }

    /// Round of a session; idle if the session has none yet
    pub async fn get_round(&self, session: &str) -> StoreResult<Round> {
        Ok(self
            .rounds
            .load(session, Utc::now())
            .await?
            .unwrap_or_default())
    }

    /// Load-modify-save of a session's round. Concurrent updates of the
    /// same session are not serialized: the last save wins.
    pub async fn update_round<T>(
        &self,
        session: &str,
        f: impl FnOnce(&mut Round) -> T,
    ) -> StoreResult<(Round, T)> {
        let now = Utc::now();
        let mut round = self.rounds.load(session, now).await?.unwrap_or_default();
        let output = f(&mut round);
        self.rounds.save(session, round.clone(), now).await?;
        Ok((round, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let words = WordBank::new(vec![Card {
            id: 1,
            person: "Ada".to_string(),
            ..Card::default()
        }])
        .unwrap();
        AppState::new(AppConfig::default(), words)
    }

    #[tokio::test]
    async fn test_unknown_session_has_idle_round() {
        let state = state();
        let round = state.get_round("nobody").await.unwrap();
        assert_eq!(round, Round::default());
        assert_eq!(round.phase(), RoundPhase::Idle);
    }

    #[tokio::test]
    async fn test_update_round_persists() {
        let state = state();
        let (round, output) = state
            .update_round("s1", |round| {
                round.skip(Category::Person, "Ada");
                round.skipped.len()
            })
            .await
            .unwrap();

        assert_eq!(output, 1);
        assert_eq!(state.get_round("s1").await.unwrap(), round);
        assert_eq!(state.get_round("s2").await.unwrap(), Round::default());
    }
}
