//! Word bank: the immutable card set loaded at startup and the random draw
//! used by the category pages.
//!
//! Also hosts the parser for the raw stanza format the card data is authored
//! in (see the `convert-words` binary).

use rand::seq::IndexedRandom;
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::types::{Card, Category};

/// Number of lines in a raw stanza, one per category in `Category::ALL` order
const STANZA_LINES: usize = 6;

/// Errors that can occur while loading word data
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read word data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed word data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Word data contains no cards")]
    Empty,
}

#[derive(Debug, Clone)]
pub struct WordBank {
    cards: Vec<Card>,
}

impl WordBank {
    pub fn new(cards: Vec<Card>) -> Result<Self, DataError> {
        if cards.is_empty() {
            return Err(DataError::Empty);
        }
        Ok(Self { cards })
    }

    /// Load the card set from a JSON array of cards
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, DataError> {
        let cards: Vec<Card> = serde_json::from_str(data)?;
        Self::new(cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Draw a word for `category` from a uniformly chosen card.
    ///
    /// Draws are independent: the same word may come up twice in a row.
    pub fn draw(&self, category: Category) -> &str {
        self.draw_with(category, &mut rand::rng())
    }

    pub fn draw_with<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> &str {
        // `new` guarantees at least one card
        self.cards
            .choose(rng)
            .map(|card| card.word(category))
            .unwrap_or_default()
    }
}

/// Parse the raw authoring format into cards.
///
/// Stanzas are separated by blank lines; each stanza lists the person,
/// world, object, action, nature and random words on consecutive lines.
/// Short stanzas leave the remaining categories empty, extra lines are
/// ignored. Ids are assigned from 1 in file order.
pub fn parse_raw(text: &str) -> Result<Vec<Card>, DataError> {
    let mut stanzas: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        stanzas.push(current);
    }

    if stanzas.is_empty() {
        return Err(DataError::Empty);
    }

    let cards = stanzas
        .into_iter()
        .enumerate()
        .map(|(index, lines)| {
            let field = |i: usize| lines.get(i).map(|s| s.to_string()).unwrap_or_default();
            if lines.len() != STANZA_LINES {
                tracing::warn!(
                    card = index + 1,
                    lines = lines.len(),
                    "Stanza does not have {} lines",
                    STANZA_LINES
                );
            }
            Card {
                id: (index + 1) as u32,
                person: field(0),
                world: field(1),
                object: field(2),
                action: field(3),
                nature: field(4),
                random: field(5),
            }
        })
        .collect();

    Ok(cards)
}
