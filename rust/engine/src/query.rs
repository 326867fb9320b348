//! Listing and lookup: turns raw list parameters into a validated store query.

use crate::cards::Card;
use crate::errors::SelectionError;
use crate::store::{CardFilter, CardQuery, CardStore};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_OFFSET: usize = 0;

/// List parameters exactly as the caller supplied them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub arcana: Option<String>,
    pub suit: Option<String>,
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub filter: CardFilter,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            filter: CardFilter::default(),
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl ListRequest {
    /// Validate raw parameters. Empty filter strings count as absent.
    pub fn from_params(params: ListParams) -> Result<Self, SelectionError> {
        let limit = parse_integer(params.limit.as_deref(), DEFAULT_LIMIT as i64);
        let offset = parse_integer(params.offset.as_deref(), DEFAULT_OFFSET as i64);
        let (limit, offset) = match (limit, offset) {
            (Some(limit), Some(offset)) => (limit, offset),
            _ => {
                return Err(SelectionError::validation(
                    "limit/offset must be integers",
                ))
            }
        };

        if limit < 1 || offset < 0 {
            return Err(SelectionError::validation(
                "limit must be >=1 and offset >=0",
            ));
        }

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);

        Ok(Self {
            filter: CardFilter {
                arcana: non_empty(params.arcana),
                suit: non_empty(params.suit),
                name_contains: non_empty(params.q),
            },
            limit,
            offset,
        })
    }

    fn to_query(&self) -> CardQuery {
        CardQuery {
            filter: self.filter.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Body of a card listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardList {
    pub cards: Vec<Card>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Run a listing against the store. `total` counts every match, not just the page.
pub fn list_cards(
    store: &dyn CardStore,
    request: &ListRequest,
) -> Result<CardList, SelectionError> {
    let page = store.query(&request.to_query())?;
    Ok(CardList {
        cards: page.cards,
        total: page.total,
        limit: request.limit,
        offset: request.offset,
    })
}

pub fn get_card(store: &dyn CardStore, id: i64) -> Result<Card, SelectionError> {
    store.get_by_id(id)?.ok_or(SelectionError::NotFound(id))
}

/// Parse an optional integer parameter; `None` means it was present but not an integer.
pub(crate) fn parse_integer(raw: Option<&str>, default: i64) -> Option<i64> {
    match raw {
        None => Some(default),
        Some(value) => value.trim().parse::<i64>().ok(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, offset: Option<&str>) -> ListParams {
        ListParams {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
            ..ListParams::default()
        }
    }

    #[test]
    fn defaults_apply_when_absent() {
        let request = ListRequest::from_params(ListParams::default()).unwrap();
        assert_eq!(request, ListRequest::default());
        assert_eq!(request.limit, 100);
        assert_eq!(request.offset, 0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for (limit, offset) in [(Some("0"), None), (None, Some("-1")), (Some("-5"), Some("0"))] {
            let err = ListRequest::from_params(params(limit, offset)).unwrap_err();
            assert_eq!(
                err,
                SelectionError::Validation("limit must be >=1 and offset >=0".into())
            );
        }
    }

    #[test]
    fn rejects_non_integers() {
        for (limit, offset) in [
            (Some("ten"), None),
            (None, Some("1.5")),
            (Some(""), None),
        ] {
            let err = ListRequest::from_params(params(limit, offset)).unwrap_err();
            assert_eq!(
                err,
                SelectionError::Validation("limit/offset must be integers".into())
            );
        }
    }

    #[test]
    fn tolerates_whitespace_and_blank_filters() {
        let request = ListRequest::from_params(ListParams {
            arcana: Some(String::new()),
            suit: Some("Cups".into()),
            q: Some(String::new()),
            limit: Some(" 5 ".into()),
            offset: Some("10".into()),
        })
        .unwrap();

        assert_eq!(request.limit, 5);
        assert_eq!(request.offset, 10);
        assert_eq!(request.filter.arcana, None);
        assert_eq!(request.filter.suit.as_deref(), Some("Cups"));
        assert_eq!(request.filter.name_contains, None);
    }
}
