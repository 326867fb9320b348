use crate::error::CliError;
use crate::ui;
use std::io::Write;
use std::path::Path;
use tarot_store::{load_cards, load_cards_from_path, seed, SeedMode, SqliteCardStore, BUNDLED_DECK};

/// Load a dataset (the bundled deck unless `data` is given) into the store.
pub fn handle_seed_command(
    store: &SqliteCardStore,
    data: Option<&Path>,
    mode: SeedMode,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let deck = match data {
        Some(path) => load_cards_from_path(path)?,
        None => load_cards(BUNDLED_DECK)?,
    };
    if deck.skipped > 0 {
        ui::display_warning(
            err,
            &format!("skipped {} malformed dataset entries", deck.skipped),
        )?;
    }

    let report = seed(store, &deck.cards, mode)?;
    writeln!(out, "{}", report.summary())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bundled_deck_then_incremental_reseed() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCardStore::from_path(dir.path().join("deck.db"));

        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_seed_command(&store, None, SeedMode::Reset, &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Seeded ALL 78 cards (after drop).\n");
        assert!(err.is_empty());

        let mut out = Vec::new();
        handle_seed_command(&store, None, SeedMode::InsertMissing, &mut out, &mut err).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Seed complete. Added 0 new cards. Total now 78.\n"
        );
    }

    #[test]
    fn malformed_entries_are_reported() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("cards.json");
        std::fs::write(
            &data,
            r#"[{"id": 1, "name": "The Fool", "arcana": "Major Arcana"}, {"id": "x", "arcana": "Major Arcana"}, 5]"#,
        )
        .unwrap();
        let store = SqliteCardStore::from_path(dir.path().join("deck.db"));

        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_seed_command(&store, Some(&data), SeedMode::InsertMissing, &mut out, &mut err)
            .unwrap();

        assert!(String::from_utf8(err).unwrap().contains("skipped 2 malformed"));
        assert!(String::from_utf8(out).unwrap().contains("Added 1 new cards. Total now 1."));
    }

    #[test]
    fn missing_dataset_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCardStore::from_path(dir.path().join("deck.db"));
        let missing = dir.path().join("nope.json");

        let result = handle_seed_command(
            &store,
            Some(&missing),
            SeedMode::Reset,
            &mut Vec::new(),
            &mut Vec::new(),
        );
        assert!(matches!(result, Err(CliError::Seed(_))));
    }
}
