//! Error type shared by every command handler.

use std::fmt;
use tarot_engine::{SelectionError, StoreError};
use tarot_store::SeedError;

#[derive(Debug)]
pub enum CliError {
    /// Writing to stdout/stderr failed
    Io(std::io::Error),

    /// Missing or invalid configuration, e.g. no database URL
    Config(String),

    /// Card selection or lookup failed
    Selection(SelectionError),

    /// Dataset could not be loaded or written
    Seed(SeedError),

    /// One or more doctor checks failed
    Diagnostics(usize),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Selection(e) => write!(f, "{}", e),
            CliError::Seed(e) => write!(f, "Seed failed: {}", e),
            CliError::Diagnostics(n) => write!(f, "{} doctor check(s) failed", n),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Selection(e) => Some(e),
            CliError::Seed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<SelectionError> for CliError {
    fn from(error: SelectionError) -> Self {
        CliError::Selection(error)
    }
}

impl From<StoreError> for CliError {
    fn from(error: StoreError) -> Self {
        CliError::Selection(error.into())
    }
}

impl From<SeedError> for CliError {
    fn from(error: SeedError) -> Self {
        CliError::Seed(error)
    }
}
