//! Random draws of distinct cards.

use crate::cards::Card;
use crate::errors::SelectionError;
use crate::query::parse_integer;
use crate::store::CardStore;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COUNT: usize = 1;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrawParams {
    pub count: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    /// Cards in the order they were drawn
    pub cards: Vec<Card>,
    pub count: usize,
}

/// Fresh generator for a single request. Pass a seed only to reproduce a draw.
pub fn request_rng(seed: Option<u64>) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

pub fn parse_count(raw: Option<&str>) -> Result<usize, SelectionError> {
    let count = parse_integer(raw, DEFAULT_COUNT as i64)
        .ok_or_else(|| SelectionError::validation("count must be an integer"))?;
    if count < 1 {
        return Err(SelectionError::validation("count must be >= 1"));
    }
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}

/// Choose `count` distinct ids uniformly without replacement.
///
/// The result keeps sampling order; it is not re-sorted.
pub fn sample_ids<R>(ids: &[i64], count: usize, rng: &mut R) -> Result<Vec<i64>, SelectionError>
where
    R: Rng + ?Sized,
{
    if count == 0 {
        return Err(SelectionError::validation("count must be >= 1"));
    }
    if count > ids.len() {
        return Err(SelectionError::InsufficientPopulation {
            requested: count,
            available: ids.len(),
        });
    }

    Ok(index::sample(rng, ids.len(), count)
        .into_iter()
        .map(|i| ids[i])
        .collect())
}

pub fn draw_cards<R>(
    store: &dyn CardStore,
    count: usize,
    rng: &mut R,
) -> Result<Draw, SelectionError>
where
    R: Rng + ?Sized,
{
    let ids = store.list_ids()?;
    let picks = sample_ids(&ids, count, rng)?;

    let mut cards = Vec::with_capacity(picks.len());
    for id in picks {
        let card = store.get_by_id(id)?.ok_or(SelectionError::NotFound(id))?;
        cards.push(card);
    }

    Ok(Draw { cards, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parse_count_defaults_and_validates() {
        assert_eq!(parse_count(None), Ok(1));
        assert_eq!(parse_count(Some("3")), Ok(3));
        assert_eq!(
            parse_count(Some("0")),
            Err(SelectionError::Validation("count must be >= 1".into()))
        );
        assert_eq!(
            parse_count(Some("two")),
            Err(SelectionError::Validation("count must be an integer".into()))
        );
        assert_eq!(
            parse_count(Some("1.0")),
            Err(SelectionError::Validation("count must be an integer".into()))
        );
    }

    #[test]
    fn sample_ids_are_distinct_members() {
        let ids: Vec<i64> = (100..120).collect();
        let mut rng = request_rng(Some(9));
        for count in 1..=ids.len() {
            let picks = sample_ids(&ids, count, &mut rng).unwrap();
            let unique: HashSet<i64> = picks.iter().copied().collect();
            assert_eq!(picks.len(), count);
            assert_eq!(unique.len(), count);
            assert!(picks.iter().all(|id| ids.contains(id)));
        }
    }

    #[test]
    fn sample_ids_rejects_oversized_request() {
        let mut rng = request_rng(Some(1));
        assert_eq!(
            sample_ids(&[1, 2, 3], 4, &mut rng),
            Err(SelectionError::InsufficientPopulation {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(
            sample_ids(&[], 1, &mut rng),
            Err(SelectionError::InsufficientPopulation {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn seeded_rng_reproduces_draw() {
        let ids: Vec<i64> = (1..=78).collect();
        let a = sample_ids(&ids, 10, &mut request_rng(Some(42))).unwrap();
        let b = sample_ids(&ids, 10, &mut request_rng(Some(42))).unwrap();
        assert_eq!(a, b);
    }
}
