use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tarot", version, about = "Tarot card deck tools")]
pub struct TarotCli {
    /// SQLite database URL (falls back to DATABASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the card dataset into the database
    Seed {
        /// JSON dataset to load instead of the bundled deck
        #[arg(long, value_name = "PATH")]
        data: Option<PathBuf>,
        /// Drop and recreate the table first (also SEED_DROP=true)
        #[arg(long)]
        drop: bool,
    },
    /// Show one card by id
    Card { id: i64 },
    /// List cards with optional filters
    List {
        #[arg(long)]
        arcana: Option<String>,
        #[arg(long)]
        suit: Option<String>,
        /// Case-insensitive name substring
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        #[arg(long)]
        offset: Option<String>,
    },
    /// Draw distinct random cards
    Draw {
        #[arg(long)]
        count: Option<String>,
        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Card of the day
    Daily {
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Personalization seed
        #[arg(long)]
        seed: Option<String>,
        /// Use the date-only derivation
        #[arg(long)]
        legacy: bool,
    },
    /// Yes/no/maybe answer from a random card
    Yesno {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check that the database is reachable and seeded
    Doctor,
}
