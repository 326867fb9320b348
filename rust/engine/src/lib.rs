//! # tarot-engine: card selection core
//!
//! Listing, lookup and the three ways of choosing cards from a tarot deck:
//! a uniform random draw, a deterministic card of the day and a yes/no
//! answer. Everything reads through the [`store::CardStore`] trait so the same
//! logic runs over SQLite in production and an in-memory deck in tests.
//!
//! ## Core Modules
//!
//! - [`cards`] - The `Card` record and arcana/suit constants
//! - [`store`] - Card store contract, filter predicate, in-memory store
//! - [`query`] - List parameter validation, pagination, lookup by id
//! - [`draw`] - Distinct random draws with per-request generators
//! - [`daily`] - SHA-256 seeded daily card, plus the legacy date-only variant
//! - [`mt`] - MT19937 generator compatible with the published daily picks
//! - [`yesno`] - Yes/no/maybe answers from a random card
//! - [`errors`] - Error types for store access and selection
//!
//! ## Deterministic Daily Card
//!
//! ```rust
//! use tarot_engine::cards::{Card, MAJOR_ARCANA};
//! use tarot_engine::daily::{daily_card, DailyRequest, DailyVariant};
//! use tarot_engine::store::MemoryCardStore;
//! use chrono::NaiveDate;
//!
//! let store = MemoryCardStore::from_cards(
//!     (1..=22).map(|id| Card::new(id, format!("Major {id}"), MAJOR_ARCANA)),
//! );
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let request = DailyRequest::new(date, Some("alice".into()));
//!
//! let first = daily_card(&store, &request, DailyVariant::Hashed).unwrap();
//! let second = daily_card(&store, &request, DailyVariant::Hashed).unwrap();
//! assert_eq!(first, second);
//! assert_eq!(first.date, "2024-01-01");
//! ```

pub mod cards;
pub mod daily;
pub mod draw;
pub mod errors;
pub mod mt;
pub mod query;
pub mod store;
pub mod yesno;

pub use cards::Card;
pub use errors::{SelectionError, StoreError};
pub use store::{CardFilter, CardPage, CardQuery, CardStore, MemoryCardStore};
