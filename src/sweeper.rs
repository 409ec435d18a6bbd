use chrono::Utc;
use std::sync::Arc;

use crate::state::AppState;

/// Spawn a background task that drops rounds of expired sessions
pub fn spawn_session_sweeper(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let interval = state.config.session_sweep_interval;

    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            match state.rounds.purge_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Purged expired sessions"),
                Err(e) => tracing::warn!("Failed to purge expired sessions: {}", e),
            }
        }
    })
}
