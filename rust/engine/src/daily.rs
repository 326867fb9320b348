//! Deterministic "card of the day".
//!
//! The current derivation hashes `"{seed}-{YYYY-MM-DD}"` with SHA-256, keeps
//! the first 32 bits of the digest as an integer seed, seeds an [`Mt19937`]
//! with it and picks one id from the ascending id list. The older, seed-less
//! derivation used the date as a `YYYYMMDD` integer directly; it is kept as
//! [`DailyVariant::Legacy`] for deployments that still need the old picks.

use crate::cards::Card;
use crate::errors::SelectionError;
use crate::mt::Mt19937;
use crate::store::CardStore;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyVariant {
    /// SHA-256 over personalization seed and date
    #[default]
    Hashed,
    /// Date-only `YYYYMMDD` seed; ignores the personalization seed
    Legacy,
}

impl DailyVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyVariant::Hashed => "hashed",
            DailyVariant::Legacy => "legacy",
        }
    }

    /// Integer seed this variant feeds to the generator.
    pub fn seed_value(&self, date: NaiveDate, seed: Option<&str>) -> u32 {
        match self {
            DailyVariant::Hashed => hashed_seed(seed, date),
            DailyVariant::Legacy => legacy_seed(date),
        }
    }
}

impl fmt::Display for DailyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DailyVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashed" => Ok(DailyVariant::Hashed),
            "legacy" => Ok(DailyVariant::Legacy),
            other => Err(format!("unknown daily variant `{other}`")),
        }
    }
}

/// Daily parameters exactly as the caller supplied them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyParams {
    pub date: Option<String>,
    pub seed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRequest {
    pub date: NaiveDate,
    pub seed: Option<String>,
}

impl DailyRequest {
    pub fn new(date: NaiveDate, seed: Option<String>) -> Self {
        Self { date, seed }
    }

    /// Validate raw parameters; a missing or empty date means `today`.
    pub fn from_params(params: DailyParams, today: NaiveDate) -> Result<Self, SelectionError> {
        let date = parse_date(params.date.as_deref(), today)?;
        Ok(Self {
            date,
            seed: params.seed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCard {
    /// ISO-8601 date the card was derived for
    pub date: String,
    pub card: Card,
}

/// Current calendar date in server-local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, SelectionError> {
    match raw {
        None | Some("") => Ok(today),
        Some(value) => NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map_err(|_| SelectionError::validation("date must be YYYY-MM-DD")),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The string that gets hashed: personalization seed, `-`, ISO date.
pub fn seed_input(seed: Option<&str>, date: NaiveDate) -> String {
    format!("{}-{}", seed.unwrap_or(""), format_date(date))
}

/// First 8 hex digits of SHA-256(`seed_input`) read as a base-16 integer.
pub fn hashed_seed(seed: Option<&str>, date: NaiveDate) -> u32 {
    let digest = Sha256::digest(seed_input(seed, date).as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Seed of the deprecated date-only derivation: the date as `YYYYMMDD`.
pub fn legacy_seed(date: NaiveDate) -> u32 {
    date.year().unsigned_abs() * 10_000 + date.month() * 100 + date.day()
}

/// Pick an id from an ascending id list for the given generator seed.
pub fn pick_id(ids: &[i64], seed: u32) -> Option<i64> {
    let mut rng = Mt19937::new(u64::from(seed));
    rng.choice(ids).copied()
}

pub fn daily_card(
    store: &dyn CardStore,
    request: &DailyRequest,
    variant: DailyVariant,
) -> Result<DailyCard, SelectionError> {
    let ids = store.list_ids()?;
    let seed = variant.seed_value(request.date, request.seed.as_deref());
    let id = pick_id(&ids, seed).ok_or(SelectionError::NoCardsAvailable)?;
    let card = store.get_by_id(id)?.ok_or(SelectionError::NotFound(id))?;

    Ok(DailyCard {
        date: format_date(request.date),
        card,
    })
}
