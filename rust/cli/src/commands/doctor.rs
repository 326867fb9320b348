//! Database diagnostics.
//!
//! `doctor` resolves the database URL, opens a connection and counts the cards,
//! printing one JSON entry per check. Any failed check makes the command fail.

use crate::error::CliError;
use crate::ui;
use std::io::Write;
use tarot_store::SqliteCardStore;

struct DoctorCheck {
    name: &'static str,
    ok: bool,
    detail: String,
    error: Option<String>,
}

impl DoctorCheck {
    fn ok(name: &'static str, detail: impl Into<String>) -> Self {
        DoctorCheck {
            name,
            ok: true,
            detail: detail.into(),
            error: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, error: impl Into<String>) -> Self {
        DoctorCheck {
            name,
            ok: false,
            detail: detail.into(),
            error: Some(error.into()),
        }
    }

    fn to_value(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "status": if self.ok { "ok" } else { "fail" },
            "detail": self.detail,
        });
        if let Some(error) = &self.error {
            value["error"] = serde_json::Value::String(error.clone());
        }
        value
    }
}

fn check_connection(store: &SqliteCardStore) -> DoctorCheck {
    let detail = format!("SQLite database at {}", store.path().display());
    let version = store.connect().and_then(|conn| {
        conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0))
            .map_err(|e: rusqlite::Error| tarot_engine::StoreError::Query(e.to_string()))
    });
    match version {
        Ok(version) => DoctorCheck::ok("connection", format!("{detail} (sqlite {version})")),
        Err(e) => DoctorCheck::fail("connection", detail, format!("Connection check failed: {e}")),
    }
}

fn check_cards(store: &SqliteCardStore) -> DoctorCheck {
    match store.count() {
        Ok(0) => DoctorCheck::fail(
            "cards",
            "cards table is empty",
            "Card check failed: no cards; run `tarot seed`",
        ),
        Ok(n) => DoctorCheck::ok("cards", format!("{n} cards available")),
        Err(e) => DoctorCheck::fail(
            "cards",
            "cards table is not readable",
            format!("Card check failed: {e}; run `tarot seed`"),
        ),
    }
}

pub fn handle_doctor_command(
    database: Option<&str>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let checks = match database.map(SqliteCardStore::open) {
        None => vec![DoctorCheck::fail(
            "database_url",
            "no database configured",
            "DATABASE_URL is required (or pass --database)",
        )],
        Some(Err(e)) => vec![DoctorCheck::fail(
            "database_url",
            "database URL could not be used",
            e.to_string(),
        )],
        Some(Ok(store)) => vec![
            DoctorCheck::ok("database_url", store.path().display().to_string()),
            check_connection(&store),
            check_cards(&store),
        ],
    };

    let mut report = serde_json::Map::new();
    let mut failed = 0;
    for check in &checks {
        if let Some(msg) = &check.error {
            failed += 1;
            ui::write_error(err, msg)?;
        }
        report.insert(check.name.to_string(), check.to_value());
    }
    ui::write_json(out, &report)?;

    if failed > 0 {
        return Err(CliError::Diagnostics(failed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarot_store::{load_cards, seed, SeedMode, BUNDLED_DECK};
    use tempfile::TempDir;

    fn report(out: &[u8]) -> serde_json::Value {
        serde_json::from_slice(out).unwrap()
    }

    #[test]
    fn seeded_database_passes() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("deck.db").display());
        let store = SqliteCardStore::open(&url).unwrap();
        seed(&store, &load_cards(BUNDLED_DECK).unwrap().cards, SeedMode::Reset).unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_doctor_command(Some(&url), &mut out, &mut err).unwrap();

        let report = report(&out);
        assert_eq!(report["connection"]["status"], "ok");
        assert_eq!(report["cards"]["detail"], "78 cards available");
        assert!(err.is_empty());
    }

    #[test]
    fn unseeded_database_fails_card_check() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("empty.db").display());

        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_doctor_command(Some(&url), &mut out, &mut err);

        assert!(matches!(result, Err(CliError::Diagnostics(1))));
        assert_eq!(report(&out)["cards"]["status"], "fail");
        assert!(String::from_utf8(err).unwrap().contains("run `tarot seed`"));
    }

    #[test]
    fn missing_or_foreign_url_fails() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_doctor_command(None, &mut out, &mut err);
        assert!(matches!(result, Err(CliError::Diagnostics(1))));

        let mut out = Vec::new();
        let result = handle_doctor_command(Some("postgres://localhost/tarot"), &mut out, &mut err);
        assert!(matches!(result, Err(CliError::Diagnostics(1))));
        assert_eq!(report(&out)["database_url"]["status"], "fail");
    }
}
