use chrono::{DateTime, Duration, Utc};

use crate::types::*;

impl Round {
    /// Current phase derived from the record
    pub fn phase(&self) -> RoundPhase {
        if self.running {
            RoundPhase::Running
        } else if self.end_time.is_some() {
            RoundPhase::Stopped
        } else {
            RoundPhase::Idle
        }
    }

    /// Start a new timed round, discarding the history of any previous one
    pub fn start(&mut self, now: DateTime<Utc>, duration_minutes: f64) {
        let duration_ms = (duration_minutes * 60_000.0).round() as i64;

        self.completed.clear();
        self.skipped.clear();
        self.running = true;
        self.start_time = Some(now);
        self.duration_minutes = Some(duration_minutes);
        self.end_time = Some(now + Duration::milliseconds(duration_ms));
    }

    /// Halt the timer flag. History is kept.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Record a guessed word.
    ///
    /// When the word had been skipped earlier, every skipped entry with the
    /// same word is dropped, whatever its category.
    pub fn complete(&mut self, category: Category, word: &str, was_skipped: bool) {
        self.completed.push(WordEntry {
            category,
            word: word.to_string(),
        });
        if was_skipped {
            self.skipped.retain(|entry| entry.word != word);
        }
    }

    pub fn skip(&mut self, category: Category, word: &str) {
        self.skipped.push(WordEntry {
            category,
            word: word.to_string(),
        });
    }

    pub fn record_category(&mut self, last_category: LastCategory) {
        self.last_category = last_category;
    }

    /// Whole seconds until the end of the round, clamped at zero.
    /// None when no round has been started.
    pub fn timeleft(&self, now: DateTime<Utc>) -> Option<i64> {
        self.end_time
            .map(|end| ((end - now).num_milliseconds() / 1000).max(0))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.running && self.end_time.is_some_and(|end| end <= now)
    }

    /// Stop a running round whose end time has passed.
    /// Returns true if the round was stopped.
    pub fn stop_if_expired(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_expired(now) {
            self.stop();
            true
        } else {
            false
        }
    }
}
