use serde::{Deserialize, Serialize};

pub const MAJOR_ARCANA: &str = "Major Arcana";
pub const MINOR_ARCANA: &str = "Minor Arcana";

/// The four suits of the Minor Arcana, in the order a standard deck lists them.
pub const SUITS: [&str; 4] = ["Cups", "Swords", "Wands", "Pentacles"];

/// A single tarot card as stored in the deck table.
///
/// Cards are created once by the seeding step and never modified through the
/// API. Optional text fields serialize as `null` rather than being omitted so
/// every endpoint returns the same eight-key object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Externally assigned identity from the source dataset
    pub id: i64,
    pub name: String,
    /// "Major Arcana" or "Minor Arcana"
    pub arcana: String,
    /// Cups, Swords, Wands, Pentacles, or `None` for majors
    pub suit: Option<String>,
    pub upright_meaning: Option<String>,
    pub reversed_meaning: Option<String>,
    /// Stored yes/no/maybe hint
    pub yes_no: Option<String>,
    pub image_url: Option<String>,
}

impl Card {
    /// Minimal constructor; optional text fields start empty.
    pub fn new(id: i64, name: impl Into<String>, arcana: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            arcana: arcana.into(),
            suit: None,
            upright_meaning: None,
            reversed_meaning: None,
            yes_no: None,
            image_url: None,
        }
    }

    pub fn with_suit(mut self, suit: impl Into<String>) -> Self {
        self.suit = Some(suit.into());
        self
    }

    pub fn with_yes_no(mut self, yes_no: impl Into<String>) -> Self {
        self.yes_no = Some(yes_no.into());
        self
    }

    pub fn is_major(&self) -> bool {
        self.arcana.eq_ignore_ascii_case(MAJOR_ARCANA)
    }

    /// Whether the suit/arcana pairing holds: minors carry a suit, majors don't.
    ///
    /// Informational only. Selection never rejects a card that fails this.
    pub fn is_well_formed(&self) -> bool {
        let has_suit = self.suit.as_deref().is_some_and(|s| !s.trim().is_empty());
        if self.arcana.eq_ignore_ascii_case(MINOR_ARCANA) {
            has_suit
        } else {
            !has_suit
        }
    }
}
