//! Card store contract and the in-memory implementation.
//!
//! The selectors only ever talk to a [`CardStore`]. Each call re-reads the
//! current state; nothing is cached between requests.

use crate::cards::Card;
use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Filter predicate for a card listing. All present criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    /// Exact, case-insensitive arcana match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcana: Option<String>,
    /// Exact, case-insensitive suit match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suit: Option<String>,
    /// Case-insensitive substring of the card name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
}

impl CardFilter {
    pub fn matches(&self, card: &Card) -> bool {
        if let Some(arcana) = &self.arcana {
            if card.arcana.to_lowercase() != arcana.to_lowercase() {
                return false;
            }
        }

        if let Some(suit) = &self.suit {
            match &card.suit {
                Some(card_suit) if card_suit.to_lowercase() == suit.to_lowercase() => {}
                _ => return false,
            }
        }

        if let Some(needle) = &self.name_contains {
            if !card.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }

        true
    }
}

/// One page of a listing, always ordered by ascending id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardQuery {
    pub filter: CardFilter,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPage {
    pub cards: Vec<Card>,
    /// Number of matches before pagination
    pub total: usize,
}

/// Read access to the deck.
pub trait CardStore: Send + Sync {
    fn get_by_id(&self, id: i64) -> Result<Option<Card>, StoreError>;

    /// All card ids in ascending order.
    fn list_ids(&self) -> Result<Vec<i64>, StoreError>;

    fn query(&self, query: &CardQuery) -> Result<CardPage, StoreError>;
}

/// Deck held in process memory, keyed by id.
#[derive(Debug, Default)]
pub struct MemoryCardStore {
    cards: RwLock<BTreeMap<i64, Card>>,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let map = cards.into_iter().map(|card| (card.id, card)).collect();
        Self {
            cards: RwLock::new(map),
        }
    }

    /// Insert or replace a card by id.
    pub fn insert(&self, card: Card) -> Result<(), StoreError> {
        let mut cards = self.cards.write().map_err(|_| StoreError::Poisoned)?;
        cards.insert(card.id, card);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let cards = self.cards.read().map_err(|_| StoreError::Poisoned)?;
        Ok(cards.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl CardStore for MemoryCardStore {
    fn get_by_id(&self, id: i64) -> Result<Option<Card>, StoreError> {
        let cards = self.cards.read().map_err(|_| StoreError::Poisoned)?;
        Ok(cards.get(&id).cloned())
    }

    fn list_ids(&self) -> Result<Vec<i64>, StoreError> {
        let cards = self.cards.read().map_err(|_| StoreError::Poisoned)?;
        Ok(cards.keys().copied().collect())
    }

    fn query(&self, query: &CardQuery) -> Result<CardPage, StoreError> {
        let cards = self.cards.read().map_err(|_| StoreError::Poisoned)?;
        let matching: Vec<&Card> = cards
            .values()
            .filter(|card| query.filter.matches(card))
            .collect();

        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();

        Ok(CardPage { cards: page, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{MAJOR_ARCANA, MINOR_ARCANA};

    fn sample_store() -> MemoryCardStore {
        MemoryCardStore::from_cards([
            Card::new(3, "The Empress", MAJOR_ARCANA),
            Card::new(1, "The Fool", MAJOR_ARCANA),
            Card::new(37, "Ace of Cups", MINOR_ARCANA).with_suit("Cups"),
            Card::new(38, "Two of Cups", MINOR_ARCANA).with_suit("Cups"),
            Card::new(51, "Ace of Swords", MINOR_ARCANA).with_suit("Swords"),
        ])
    }

    #[test]
    fn list_ids_is_ascending() {
        let store = sample_store();
        assert_eq!(store.list_ids().unwrap(), vec![1, 3, 37, 38, 51]);
    }

    #[test]
    fn filter_is_case_insensitive_and_combined() {
        let filter = CardFilter {
            arcana: Some("minor arcana".into()),
            suit: None,
            name_contains: Some("ACE".into()),
        };
        let store = sample_store();
        let page = store
            .query(&CardQuery {
                filter,
                limit: 10,
                offset: 0,
            })
            .unwrap();

        let ids: Vec<i64> = page.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![37, 51]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn suit_filter_never_matches_suitless_cards() {
        let filter = CardFilter {
            suit: Some("cups".into()),
            ..CardFilter::default()
        };
        assert!(!filter.matches(&Card::new(1, "The Fool", MAJOR_ARCANA)));
        assert!(filter.matches(&Card::new(37, "Ace of Cups", MINOR_ARCANA).with_suit("Cups")));
    }

    #[test]
    fn total_ignores_pagination() {
        let store = sample_store();
        let page = store
            .query(&CardQuery {
                filter: CardFilter::default(),
                limit: 2,
                offset: 4,
            })
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.cards[0].id, 51);
    }

    #[test]
    fn insert_replaces_by_id() {
        let store = MemoryCardStore::new();
        assert!(store.is_empty().unwrap());
        store.insert(Card::new(5, "Old", MAJOR_ARCANA)).unwrap();
        store.insert(Card::new(5, "New", MAJOR_ARCANA)).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get_by_id(5).unwrap().unwrap().name, "New");
        assert!(store.get_by_id(6).unwrap().is_none());
    }
}
