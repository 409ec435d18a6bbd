use chrono::Utc;

use super::store::StoreResult;
use super::AppState;
use crate::commands::{CompleteCommand, SkipCommand, StartCommand};
use crate::types::*;

/// What a category page shows
#[derive(Debug, Clone, PartialEq)]
pub struct PageVisit {
    pub category: Option<Category>,
    /// None on the home page
    pub word: Option<String>,
    /// Seconds left in the round, None when no round was started
    pub timeleft: Option<i64>,
    pub round: Round,
}

impl AppState {
    /// Start (or restart) the session's round
    pub async fn start_round(&self, session: &str, cmd: &StartCommand) -> StoreResult<Round> {
        let now = Utc::now();
        let (round, _) = self
            .update_round(session, |round| round.start(now, cmd.duration_minutes))
            .await?;

        tracing::info!(
            session,
            minutes = cmd.duration_minutes,
            "Round started"
        );
        Ok(round)
    }

    pub async fn stop_round(&self, session: &str) -> StoreResult<Round> {
        let (round, _) = self.update_round(session, Round::stop).await?;
        tracing::info!(
            session,
            completed = round.completed.len(),
            skipped = round.skipped.len(),
            "Round stopped"
        );
        Ok(round)
    }

    pub async fn complete_word(&self, session: &str, cmd: &CompleteCommand) -> StoreResult<Round> {
        let (round, _) = self
            .update_round(session, |round| {
                round.complete(cmd.category, &cmd.word, cmd.was_skipped)
            })
            .await?;
        tracing::debug!(session, category = %cmd.category, word = %cmd.word, "Word completed");
        Ok(round)
    }

    pub async fn skip_word(&self, session: &str, cmd: &SkipCommand) -> StoreResult<Round> {
        let (round, _) = self
            .update_round(session, |round| round.skip(cmd.category, &cmd.word))
            .await?;
        tracing::debug!(session, category = %cmd.category, word = %cmd.word, "Word skipped");
        Ok(round)
    }

    /// Visit a category page (None = home page).
    ///
    /// Draws a word, remembers the category for redirects and reports the
    /// time left. The round only transitions when server-side expiry is
    /// enabled and its end time has passed.
    pub async fn visit_page(
        &self,
        session: &str,
        category: Option<Category>,
    ) -> StoreResult<PageVisit> {
        let now = Utc::now();
        let enforce_expiry = self.config.enforce_round_expiry;

        let (round, expired) = self
            .update_round(session, |round| {
                round.record_category(
                    category
                        .map(LastCategory::from_category)
                        .unwrap_or_else(LastCategory::home),
                );
                enforce_expiry && round.stop_if_expired(now)
            })
            .await?;

        if expired {
            tracing::info!(session, "Round expired");
        }

        let word = category.map(|c| self.words.draw(c).to_string());
        tracing::debug!(?category, ?word, "Drew word");

        Ok(PageVisit {
            category,
            word,
            timeleft: round.timeleft(now),
            round,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::words::WordBank;

    fn state(enforce_round_expiry: bool) -> AppState {
        let words = WordBank::new(vec![
            Card {
                id: 1,
                person: "Ada".to_string(),
                world: "Rome".to_string(),
                ..Card::default()
            },
            Card {
                id: 2,
                person: "Plato".to_string(),
                world: "Oslo".to_string(),
                ..Card::default()
            },
        ])
        .unwrap();
        let config = AppConfig {
            enforce_round_expiry,
            ..AppConfig::default()
        };
        AppState::new(config, words)
    }

    fn complete(category: Category, word: &str, was_skipped: bool) -> CompleteCommand {
        CompleteCommand {
            category,
            word: word.to_string(),
            was_skipped,
        }
    }

    fn skip(category: Category, word: &str) -> SkipCommand {
        SkipCommand {
            category,
            word: word.to_string(),
        }
    }

    #[tokio::test]
    async fn test_start_then_visit_reports_timeleft() {
        let state = state(false);
        let round = state
            .start_round("s", &StartCommand { duration_minutes: 5.0 })
            .await
            .unwrap();
        assert!(round.running);
        assert_eq!(round.duration_minutes, Some(5.0));

        let visit = state.visit_page("s", Some(Category::Person)).await.unwrap();
        let timeleft = visit.timeleft.unwrap();
        assert!((298..=300).contains(&timeleft));
        assert!(["Ada", "Plato"].contains(&visit.word.as_deref().unwrap()));
        assert_eq!(visit.round.last_category, LastCategory::from_category(Category::Person));
    }

    #[tokio::test]
    async fn test_home_visit_draws_nothing() {
        let state = state(false);
        let visit = state.visit_page("s", None).await.unwrap();

        assert_eq!(visit.word, None);
        assert_eq!(visit.timeleft, None);
        assert_eq!(visit.round.last_category.redirect_path(), "/");
    }

    #[tokio::test]
    async fn test_complete_and_skip_flow() {
        let state = state(false);
        state
            .start_round("s", &StartCommand { duration_minutes: 1.0 })
            .await
            .unwrap();

        state.skip_word("s", &skip(Category::World, "Rome")).await.unwrap();
        state.skip_word("s", &skip(Category::Person, "Ada")).await.unwrap();
        let round = state
            .complete_word("s", &complete(Category::World, "Rome", true))
            .await
            .unwrap();

        assert_eq!(round.completed.len(), 1);
        assert_eq!(round.skipped.len(), 1);
        assert_eq!(round.skipped[0].word, "Ada");
    }

    #[tokio::test]
    async fn test_stop_keeps_lists() {
        let state = state(false);
        state
            .start_round("s", &StartCommand { duration_minutes: 1.0 })
            .await
            .unwrap();
        state
            .complete_word("s", &complete(Category::Person, "Ada", false))
            .await
            .unwrap();
        state.skip_word("s", &skip(Category::World, "Oslo")).await.unwrap();

        let round = state.stop_round("s").await.unwrap();

        assert!(!round.running);
        assert_eq!(round.completed.len(), 1);
        assert_eq!(round.skipped.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let state = state(false);
        state
            .start_round("a", &StartCommand { duration_minutes: 1.0 })
            .await
            .unwrap();
        state.skip_word("a", &skip(Category::World, "Oslo")).await.unwrap();

        let other = state.get_round("b").await.unwrap();
        assert!(!other.running);
        assert!(other.skipped.is_empty());
    }

    async fn expire_round(state: &AppState, session: &str) {
        state
            .update_round(session, |round| {
                round.start(Utc::now() - chrono::Duration::minutes(2), 1.0)
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_expired_round_keeps_running_by_default() {
        let state = state(false);
        expire_round(&state, "s").await;

        let visit = state.visit_page("s", Some(Category::World)).await.unwrap();
        assert_eq!(visit.timeleft, Some(0));
        assert!(visit.round.running);
    }

    #[tokio::test]
    async fn test_expired_round_is_stopped_when_enforced() {
        let state = state(true);
        expire_round(&state, "s").await;

        let visit = state.visit_page("s", Some(Category::World)).await.unwrap();
        assert_eq!(visit.timeleft, Some(0));
        assert_eq!(visit.round.phase(), RoundPhase::Stopped);
        assert!(!state.get_round("s").await.unwrap().running);
    }
}
