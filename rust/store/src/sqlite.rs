use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tarot_engine::{Card, CardPage, CardQuery, CardStore, StoreError};

const COLUMNS: &str =
    "id, name, arcana, suit, upright_meaning, reversed_meaning, yes_no, image_url";

/// Resolve a configured database URL to a SQLite file path.
///
/// Accepts `sqlite://path`, `sqlite:path`, `file:path` or a bare path.
/// Server URLs such as `postgres://` are rejected.
pub fn normalize_database_url(url: &str) -> Result<PathBuf, StoreError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(StoreError::Unavailable("database url is empty".into()));
    }

    let path = if let Some(rest) = url.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = url.strip_prefix("sqlite:") {
        rest
    } else if let Some(rest) = url.strip_prefix("file:") {
        rest
    } else if let Some((scheme, _)) = url.split_once("://") {
        return Err(StoreError::Unavailable(format!(
            "unsupported database scheme `{scheme}`; expected a sqlite path"
        )));
    } else {
        url
    };

    if path.is_empty() {
        return Err(StoreError::Unavailable(format!(
            "database url `{url}` has no path"
        )));
    }
    Ok(PathBuf::from(path))
}

/// Card store over a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteCardStore {
    path: PathBuf,
}

impl SqliteCardStore {
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self::from_path(normalize_database_url(url)?))
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection for a single operation.
    pub fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path).map_err(|err| {
            StoreError::Unavailable(format!("open {}: {}", self.path.display(), err))
        })
    }

    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        create_schema(&conn)
    }

    pub fn drop_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute("DROP TABLE IF EXISTS cards", [])
            .map_err(query_error)?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        count_cards(&conn)
    }

    /// Insert cards in one transaction. With `skip_existing`, ids already
    /// present are left untouched and not counted.
    pub fn insert_cards(&self, cards: &[Card], skip_existing: bool) -> Result<usize, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(query_error)?;

        let existing: HashSet<i64> = if skip_existing {
            let mut stmt = tx.prepare("SELECT id FROM cards").map_err(query_error)?;
            let ids = stmt
                .query_map([], |row| row.get::<_, i64>(0))
                .map_err(query_error)?
                .collect::<Result<HashSet<_>, _>>()
                .map_err(query_error)?;
            ids
        } else {
            HashSet::new()
        };

        let mut inserted = 0;
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO cards ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ))
                .map_err(query_error)?;

            for card in cards.iter().filter(|c| !existing.contains(&c.id)) {
                stmt.execute(rusqlite::params![
                    card.id,
                    &card.name,
                    &card.arcana,
                    &card.suit,
                    &card.upright_meaning,
                    &card.reversed_meaning,
                    &card.yes_no,
                    &card.image_url,
                ])
                .map_err(|err| {
                    StoreError::Query(format!("insert card {}: {}", card.id, err))
                })?;
                inserted += 1;
            }
        }

        tx.commit().map_err(query_error)?;
        Ok(inserted)
    }
}

impl CardStore for SqliteCardStore {
    fn get_by_id(&self, id: i64) -> Result<Option<Card>, StoreError> {
        let conn = self.connect()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM cards WHERE id = ?1"),
            [id],
            card_from_row,
        )
        .optional()
        .map_err(query_error)
    }

    fn list_ids(&self) -> Result<Vec<i64>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id FROM cards ORDER BY id")
            .map_err(query_error)?;
        let ids = stmt
            .query_map([], |row| row.get(0))
            .map_err(query_error)?
            .collect::<Result<Vec<i64>, _>>()
            .map_err(query_error)?;
        Ok(ids)
    }

    fn query(&self, query: &CardQuery) -> Result<CardPage, StoreError> {
        let (clause, mut values) = where_clause(query);
        let conn = self.connect()?;

        let total: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM cards{clause}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )
            .map_err(query_error)?;

        values.push(Value::Integer(to_sql_int(query.limit)));
        values.push(Value::Integer(to_sql_int(query.offset)));
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM cards{clause} ORDER BY id LIMIT ? OFFSET ?"
            ))
            .map_err(query_error)?;
        let cards = stmt
            .query_map(params_from_iter(values.iter()), card_from_row)
            .map_err(query_error)?
            .collect::<Result<Vec<Card>, _>>()
            .map_err(query_error)?;

        Ok(CardPage {
            cards,
            total: usize::try_from(total).unwrap_or(0),
        })
    }
}

fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER NOT NULL PRIMARY KEY,
            name TEXT NOT NULL,
            arcana TEXT NOT NULL,
            suit TEXT,
            upright_meaning TEXT,
            reversed_meaning TEXT,
            yes_no TEXT,
            image_url TEXT
        );
        CREATE INDEX IF NOT EXISTS ix_cards_name ON cards (name);
        CREATE INDEX IF NOT EXISTS ix_cards_arcana ON cards (arcana);
        CREATE INDEX IF NOT EXISTS ix_cards_suit ON cards (suit);",
    )
    .map_err(query_error)
}

fn count_cards(conn: &Connection) -> Result<usize, StoreError> {
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))
        .map_err(query_error)?;
    Ok(usize::try_from(total).unwrap_or(0))
}

fn where_clause(query: &CardQuery) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(arcana) = &query.filter.arcana {
        conditions.push("LOWER(arcana) = LOWER(?)");
        values.push(Value::Text(arcana.clone()));
    }
    if let Some(suit) = &query.filter.suit {
        conditions.push("LOWER(suit) = LOWER(?)");
        values.push(Value::Text(suit.clone()));
    }
    if let Some(needle) = &query.filter.name_contains {
        conditions.push("LOWER(name) LIKE '%' || LOWER(?) || '%' ESCAPE '\\'");
        values.push(Value::Text(escape_like(needle)));
    }

    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        name: row.get(1)?,
        arcana: row.get(2)?,
        suit: row.get(3)?,
        upright_meaning: row.get(4)?,
        reversed_meaning: row.get(5)?,
        yes_no: row.get(6)?,
        image_url: row.get(7)?,
    })
}

fn sqlite_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(info, _)
            if matches!(
                info.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}

fn query_error(err: rusqlite::Error) -> StoreError {
    if sqlite_busy(&err) {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Query(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarot_engine::CardFilter;

    #[test]
    fn normalizes_sqlite_urls() {
        assert_eq!(
            normalize_database_url("sqlite:///tmp/deck.db").unwrap(),
            PathBuf::from("/tmp/deck.db")
        );
        assert_eq!(
            normalize_database_url("sqlite:deck.db").unwrap(),
            PathBuf::from("deck.db")
        );
        assert_eq!(
            normalize_database_url("file:deck.db").unwrap(),
            PathBuf::from("deck.db")
        );
        assert_eq!(
            normalize_database_url(" ./deck.db ").unwrap(),
            PathBuf::from("./deck.db")
        );
    }

    #[test]
    fn rejects_server_urls_and_empty_paths() {
        for url in ["postgres://u:p@host/db", "postgresql+psycopg://host/db", "", "sqlite://"] {
            assert!(
                matches!(normalize_database_url(url), Err(StoreError::Unavailable(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn where_clause_joins_filters() {
        let query = CardQuery {
            filter: CardFilter {
                arcana: Some("Minor Arcana".into()),
                suit: Some("cups".into()),
                name_contains: None,
            },
            limit: 5,
            offset: 0,
        };
        let (clause, values) = where_clause(&query);
        assert_eq!(
            clause,
            " WHERE LOWER(arcana) = LOWER(?) AND LOWER(suit) = LOWER(?)"
        );
        assert_eq!(values.len(), 2);
    }
}
