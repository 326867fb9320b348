//! Loading the card dataset and seeding the store with it.

use crate::sqlite::SqliteCardStore;
use serde_json::Value;
use std::path::Path;
use tarot_engine::{Card, StoreError};
use thiserror::Error;

/// The 78-card deck shipped with the repository.
pub const BUNDLED_DECK: &str = include_str!("../../../data/cards.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Dataset must be a JSON array of cards")]
    NotAnArray,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Drop and recreate the table, then insert every card
    Reset,
    /// Create the table if needed and insert only ids not yet present
    #[default]
    InsertMissing,
}

impl SeedMode {
    /// `SEED_DROP=true` selects [`SeedMode::Reset`].
    pub fn from_env() -> Self {
        match std::env::var("SEED_DROP") {
            Ok(value) if value.trim().eq_ignore_ascii_case("true") => SeedMode::Reset,
            _ => SeedMode::InsertMissing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub mode: SeedMode,
    pub inserted: usize,
    /// Cards in the table after seeding
    pub total: usize,
}

impl SeedReport {
    pub fn summary(&self) -> String {
        match self.mode {
            SeedMode::Reset => format!("Seeded ALL {} cards (after drop).", self.total),
            SeedMode::InsertMissing => format!(
                "Seed complete. Added {} new cards. Total now {}.",
                self.inserted, self.total
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDeck {
    pub cards: Vec<Card>,
    /// Entries dropped for missing id, arcana or name
    pub skipped: usize,
}

/// Parse a dataset. Entries that are not objects, lack a truthy `id` or
/// `arcana`, have an id that is not an integer, or have no name are skipped.
pub fn load_cards(json: &str) -> Result<LoadedDeck, SeedError> {
    let raw: Value = serde_json::from_str(json)?;
    let items = raw.as_array().ok_or(SeedError::NotAnArray)?;

    let mut cards = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match card_from_value(item) {
            Some(card) => cards.push(card),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "skipped malformed dataset entries");
    }
    Ok(LoadedDeck { cards, skipped })
}

pub fn load_cards_from_path(path: &Path) -> Result<LoadedDeck, SeedError> {
    let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_cards(&json)
}

pub fn seed(
    store: &SqliteCardStore,
    cards: &[Card],
    mode: SeedMode,
) -> Result<SeedReport, SeedError> {
    let inserted = match mode {
        SeedMode::Reset => {
            store.drop_schema()?;
            store.ensure_schema()?;
            store.insert_cards(cards, false)?
        }
        SeedMode::InsertMissing => {
            store.ensure_schema()?;
            store.insert_cards(cards, true)?
        }
    };

    let total = store.count()?;
    tracing::info!(
        path = %store.path().display(),
        ?mode,
        inserted,
        total,
        "seeded card store"
    );
    Ok(SeedReport {
        mode,
        inserted,
        total,
    })
}

fn card_from_value(item: &Value) -> Option<Card> {
    let obj = item.as_object()?;
    let id = coerce_id(obj.get("id")?)?;
    let arcana = text(obj.get("arcana"))?;
    let name = text(obj.get("name"))?;

    Some(Card {
        id,
        name,
        arcana,
        suit: text(obj.get("suit")),
        upright_meaning: text(obj.get("upright_meaning")),
        reversed_meaning: text(obj.get("reversed_meaning")),
        yes_no: text(obj.get("yes_no")),
        image_url: text(obj.get("image_url")),
    })
}

/// Integer ids, integral floats and numeric strings are accepted; zero is not.
fn coerce_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (id != 0).then_some(id)
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
