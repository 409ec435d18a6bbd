//! Request parsing for the round commands.
//!
//! Raw query strings are deserialized leniently (every field optional,
//! strings only) and then validated into typed commands. A command that
//! fails validation never reaches the round state.

use serde::Deserialize;

use crate::error::AppError;
use crate::types::Category;

/// Longest round that can be started, in minutes
pub const MAX_ROUND_MINUTES: f64 = 180.0;

#[derive(Debug, Default, Deserialize)]
pub struct StartQuery {
    pub time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WordQuery {
    pub category: Option<String>,
    pub word: Option<String>,
    pub skipped: Option<String>,
}

/// Values the browser keeps track of and hands back on every page load
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub time: Option<String>,
    pub score: Option<String>,
    pub skipped: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartCommand {
    pub duration_minutes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompleteCommand {
    pub category: Category,
    pub word: String,
    pub was_skipped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkipCommand {
    pub category: Category,
    pub word: String,
}

/// Client-reported counters shown on the page. Unparseable values are
/// dropped, not rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageParams {
    pub time: Option<f64>,
    pub score: Option<u32>,
    pub skipped: Option<u32>,
}

impl StartCommand {
    pub fn parse(query: StartQuery) -> Result<Self, AppError> {
        let raw = query
            .time
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::invalid("time", "is required"))?;

        let minutes: f64 = raw
            .parse()
            .map_err(|_| AppError::invalid("time", format!("{raw:?} is not a number")))?;

        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(AppError::invalid("time", "must be a positive number of minutes"));
        }
        if minutes > MAX_ROUND_MINUTES {
            return Err(AppError::invalid(
                "time",
                format!("must be at most {MAX_ROUND_MINUTES} minutes"),
            ));
        }

        Ok(Self {
            duration_minutes: minutes,
        })
    }
}

impl CompleteCommand {
    pub fn parse(query: WordQuery) -> Result<Self, AppError> {
        let was_skipped = query.skipped.as_deref().is_some_and(is_truthy);
        let SkipCommand { category, word } = SkipCommand::parse(query)?;
        Ok(Self {
            category,
            word,
            was_skipped,
        })
    }
}

impl SkipCommand {
    pub fn parse(query: WordQuery) -> Result<Self, AppError> {
        let category = query
            .category
            .ok_or_else(|| AppError::invalid("category", "is required"))?
            .parse::<Category>()
            .map_err(|e| AppError::invalid("category", e.to_string()))?;

        let word = query
            .word
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .ok_or_else(|| AppError::invalid("word", "must not be empty"))?;

        Ok(Self { category, word })
    }
}

impl From<PageQuery> for PageParams {
    fn from(query: PageQuery) -> Self {
        fn lenient<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
            value.and_then(|v| v.trim().parse().ok())
        }

        Self {
            time: lenient::<f64>(query.time).filter(|t| t.is_finite()),
            score: lenient(query.score),
            skipped: lenient(query.skipped),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}
