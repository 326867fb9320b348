//! SQLite-backed card store and the dataset loader that fills it.
//!
//! [`SqliteCardStore`] implements [`tarot_engine::CardStore`]. Every call
//! opens its own connection and releases it before returning, so request
//! handlers never share a handle.

pub mod seed;
pub mod sqlite;

pub use seed::{
    load_cards, load_cards_from_path, seed, LoadedDeck, SeedError, SeedMode, SeedReport,
    BUNDLED_DECK,
};
pub use sqlite::{normalize_database_url, SqliteCardStore};
