use thiserror::Error;

/// Failures raised by the card store backing the selectors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Card store unavailable: {0}")]
    Unavailable(String),
    #[error("Card query failed: {0}")]
    Query(String),
    #[error("Card store lock poisoned")]
    Poisoned,
}

/// Errors produced by listing, lookup and the card selectors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Malformed or out-of-range caller input.
    #[error("{0}")]
    Validation(String),
    #[error("Card not found")]
    NotFound(i64),
    #[error("no cards available")]
    NoCardsAvailable,
    #[error("count exceeds number of available cards")]
    InsufficientPopulation { requested: usize, available: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SelectionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SelectionError::Validation(message.into())
    }

    /// True for errors caused by the caller's input or an empty deck rather
    /// than a fault in the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, SelectionError::Store(_))
    }
}
