mod common;

use common::{call, ids};
use serde_json::json;
use std::sync::Arc;
use tarot_store::{load_cards, seed, SeedMode, SqliteCardStore, BUNDLED_DECK};
use tarot_web::{AppContext, ServerConfig};
use tempfile::TempDir;
use warp::http::StatusCode;

fn sqlite_context(dir: &TempDir, seeded: bool) -> AppContext {
    let url = format!("sqlite://{}", dir.path().join("tarot.db").display());
    let store = SqliteCardStore::open(&url).expect("open store");
    if seeded {
        let deck = load_cards(BUNDLED_DECK).expect("bundled deck");
        seed(&store, &deck.cards, SeedMode::Reset).expect("seed");
    }
    AppContext::with_store(ServerConfig::for_tests(), Arc::new(store))
}

#[tokio::test]
async fn sqlite_store_serves_the_same_answers() {
    let dir = TempDir::new().unwrap();
    let ctx = sqlite_context(&dir, true);

    let (status, page) = call(&ctx, "GET", "/cards?suit=cUpS&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 14);
    assert_eq!(ids(&page["cards"]), vec![37, 38, 39, 40, 41]);

    let (_, daily) = call(&ctx, "GET", "/daily?date=2024-01-01&seed=alice").await;
    assert_eq!(daily["card"]["id"], 57);

    let (_, drawn) = call(&ctx, "POST", "/draw?count=3").await;
    assert_eq!(ids(&drawn["cards"]).len(), 3);

    let (status, body) = call(&ctx, "GET", "/cards/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Card not found" }));
}

#[tokio::test]
async fn unseeded_database_is_a_server_error() {
    let dir = TempDir::new().unwrap();
    let ctx = sqlite_context(&dir, false);

    let (status, body) = call(&ctx, "GET", "/cards").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}
