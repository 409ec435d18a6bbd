use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque ID types for type safety
pub type SessionId = String;
pub type CardId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Person,
    World,
    Object,
    Action,
    Nature,
    Random,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Person,
        Category::World,
        Category::Object,
        Category::Action,
        Category::Nature,
        Category::Random,
    ];

    /// Route segment and card field name
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Person => "person",
            Category::World => "world",
            Category::Object => "object",
            Category::Action => "action",
            Category::Nature => "nature",
            Category::Random => "random",
        }
    }

    /// Name shown on the page
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Person => "Person",
            Category::World => "World",
            Category::Object => "Object",
            Category::Action => "Action",
            Category::Nature => "Nature",
            Category::Random => "Random",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.slug() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One record of the word data set, holding a word per category.
/// Missing fields in the source data read as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Card {
    pub id: CardId,
    #[serde(default)]
    pub person: String,
    #[serde(default)]
    pub world: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub nature: String,
    #[serde(default)]
    pub random: String,
}

impl Card {
    pub fn word(&self, category: Category) -> &str {
        match category {
            Category::Person => &self.person,
            Category::World => &self.world,
            Category::Object => &self.object,
            Category::Action => &self.action,
            Category::Nature => &self.nature,
            // Literal `random` column of the data set
            Category::Random => &self.random,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordEntry {
    pub category: Category,
    pub word: String,
}

/// Category the browser last looked at, used to send it back there after
/// every round command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LastCategory {
    /// None for the home page
    pub name: Option<String>,
    pub slug: String,
}

impl LastCategory {
    pub fn home() -> Self {
        Self::default()
    }

    pub fn from_category(category: Category) -> Self {
        Self {
            name: Some(category.display_name().to_string()),
            slug: category.slug().to_string(),
        }
    }

    pub fn redirect_path(&self) -> String {
        format!("/{}", self.slug)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    Idle,
    Running,
    Stopped,
}

/// Per-session round record. `Round::default()` is the idle state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Round {
    pub running: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<f64>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: Vec<WordEntry>,
    #[serde(default)]
    pub skipped: Vec<WordEntry>,
    #[serde(default)]
    pub last_category: LastCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Person".parse::<Category>().unwrap(), Category::Person);
        assert_eq!(" nature ".parse::<Category>().unwrap(), Category::Nature);
        assert_eq!("RANDOM".parse::<Category>().unwrap(), Category::Random);
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        let err = "animal".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("animal".to_string()));
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_card_missing_fields_default_to_empty() {
        let card: Card = serde_json::from_str(r#"{"id": 3, "person": "Elvis"}"#).unwrap();
        assert_eq!(card.word(Category::Person), "Elvis");
        assert_eq!(card.word(Category::World), "");
        assert_eq!(card.word(Category::Random), "");
    }

    #[test]
    fn test_last_category_redirect_path() {
        assert_eq!(LastCategory::home().redirect_path(), "/");
        let last = LastCategory::from_category(Category::Action);
        assert_eq!(last.name.as_deref(), Some("Action"));
        assert_eq!(last.redirect_path(), "/action");
    }

    #[test]
    fn test_round_serializes_as_json() {
        let round = Round {
            running: true,
            completed: vec![WordEntry {
                category: Category::World,
                word: "Paris".to_string(),
            }],
            ..Round::default()
        };
        let json = serde_json::to_string(&round).unwrap();
        assert!(json.contains("\"category\":\"world\""));
        let back: Round = serde_json::from_str(&json).unwrap();
        assert_eq!(back, round);
    }
}
