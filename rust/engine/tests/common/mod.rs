use tarot_engine::cards::{Card, MAJOR_ARCANA, MINOR_ARCANA};
use tarot_engine::MemoryCardStore;

const RANKS: [&str; 14] = [
    "Ace", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Page",
    "Knight", "Queen", "King",
];

/// 78-card deck: majors 1-22, then Wands, Cups, Swords, Pentacles.
pub fn standard_deck() -> Vec<Card> {
    let mut cards: Vec<Card> = (1..=22)
        .map(|id| Card::new(id, format!("Major {id}"), MAJOR_ARCANA).with_yes_no("yes"))
        .collect();

    let mut id = 23;
    for suit in ["Wands", "Cups", "Swords", "Pentacles"] {
        for rank in RANKS {
            cards.push(Card::new(id, format!("{rank} of {suit}"), MINOR_ARCANA).with_suit(suit));
            id += 1;
        }
    }
    cards
}

pub fn standard_store() -> MemoryCardStore {
    MemoryCardStore::from_cards(standard_deck())
}
