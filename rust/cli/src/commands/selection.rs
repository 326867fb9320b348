use crate::error::CliError;
use crate::ui;
use std::io::Write;
use tarot_engine::daily::{self, DailyParams, DailyRequest, DailyVariant};
use tarot_engine::draw::{self, request_rng};
use tarot_engine::{yesno, CardStore};

/// Draw `count` distinct cards. A seed makes the draw reproducible.
pub fn handle_draw_command(
    store: &dyn CardStore,
    count: Option<&str>,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let count = draw::parse_count(count)?;
    let mut rng = request_rng(seed);
    let drawn = draw::draw_cards(store, count, &mut rng)?;
    ui::write_json(out, &drawn)?;
    Ok(())
}

pub fn handle_daily_command(
    store: &dyn CardStore,
    params: DailyParams,
    legacy: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let variant = if legacy {
        DailyVariant::Legacy
    } else {
        DailyVariant::Hashed
    };
    let request = DailyRequest::from_params(params, daily::today())?;
    let card = daily::daily_card(store, &request, variant)?;
    ui::write_json(out, &card)?;
    Ok(())
}

pub fn handle_yesno_command(
    store: &dyn CardStore,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut rng = request_rng(seed);
    let answer = yesno::yes_no(store, &mut rng)?;
    ui::write_json(out, &answer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarot_engine::cards::{Card, MAJOR_ARCANA};
    use tarot_engine::MemoryCardStore;

    fn majors() -> MemoryCardStore {
        MemoryCardStore::from_cards((1..=22).map(|id| Card::new(id, format!("Major {id}"), MAJOR_ARCANA)))
    }

    fn json(out: &[u8]) -> serde_json::Value {
        serde_json::from_slice(out).unwrap()
    }

    #[test]
    fn seeded_draws_repeat() {
        let store = majors();
        let mut first = Vec::new();
        let mut second = Vec::new();
        handle_draw_command(&store, Some("4"), Some(7), &mut first).unwrap();
        handle_draw_command(&store, Some("4"), Some(7), &mut second).unwrap();

        assert_eq!(first, second);
        assert_eq!(json(&first)["count"], 4);
    }

    #[test]
    fn oversized_draw_fails() {
        let mut out = Vec::new();
        let err = handle_draw_command(&majors(), Some("23"), None, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "count exceeds number of available cards");
    }

    #[test]
    fn daily_matches_published_pick() {
        let mut out = Vec::new();
        let params = DailyParams {
            date: Some("2024-01-01".into()),
            seed: Some("alice".into()),
        };
        handle_daily_command(&majors(), params, false, &mut out).unwrap();

        let daily = json(&out);
        assert_eq!(daily["date"], "2024-01-01");
        assert_eq!(daily["card"]["id"], 15);
    }

    #[test]
    fn bad_daily_date_fails() {
        let mut out = Vec::new();
        let params = DailyParams {
            date: Some("2024/01/01".into()),
            seed: None,
        };
        let err = handle_daily_command(&majors(), params, true, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "date must be YYYY-MM-DD");
    }

    #[test]
    fn yesno_reports_single_card() {
        let mut out = Vec::new();
        handle_yesno_command(&majors(), Some(1), &mut out).unwrap();

        let answer = json(&out);
        assert_eq!(answer["count"], 1);
        assert!(["yes", "no", "maybe"].contains(&answer["answer"].as_str().unwrap()));
    }
}
