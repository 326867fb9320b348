//! Yes/no/maybe answers drawn from a random card.

use crate::cards::Card;
use crate::errors::SelectionError;
use crate::store::CardStore;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
    Maybe,
}

impl Answer {
    const BY_REMAINDER: [Answer; 3] = [Answer::Yes, Answer::No, Answer::Maybe];

    pub fn parse(raw: &str) -> Option<Answer> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Answer::Yes),
            "no" => Some(Answer::No),
            "maybe" => Some(Answer::Maybe),
            _ => None,
        }
    }

    /// Fallback for cards without a usable stored hint.
    pub fn for_id(id: i64) -> Answer {
        Self::BY_REMAINDER[id.rem_euclid(3) as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YesNo {
    pub answer: Answer,
    pub card: Card,
    pub count: usize,
}

/// Stored hint when it is yes/no/maybe, otherwise `[yes, no, maybe][id % 3]`.
pub fn answer_for(card: &Card) -> Answer {
    card.yes_no
        .as_deref()
        .and_then(Answer::parse)
        .unwrap_or_else(|| Answer::for_id(card.id))
}

pub fn yes_no<R>(store: &dyn CardStore, rng: &mut R) -> Result<YesNo, SelectionError>
where
    R: Rng + ?Sized,
{
    let ids = store.list_ids()?;
    let id = *ids.choose(rng).ok_or(SelectionError::NoCardsAvailable)?;
    let card = store.get_by_id(id)?.ok_or(SelectionError::NotFound(id))?;

    Ok(YesNo {
        answer: answer_for(&card),
        card,
        count: 1,
    })
}
