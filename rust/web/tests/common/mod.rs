#![allow(dead_code)]

use serde_json::Value;
use std::sync::Arc;
use tarot_engine::MemoryCardStore;
use tarot_store::{load_cards, BUNDLED_DECK};
use tarot_web::{routes, AppContext, ServerConfig};
use warp::http::StatusCode;

pub fn bundled_store() -> Arc<MemoryCardStore> {
    let deck = load_cards(BUNDLED_DECK).expect("bundled deck parses");
    Arc::new(MemoryCardStore::from_cards(deck.cards))
}

pub fn context_with(store: Arc<MemoryCardStore>) -> AppContext {
    AppContext::with_store(ServerConfig::for_tests(), store)
}

pub fn bundled_context() -> AppContext {
    context_with(bundled_store())
}

pub async fn call(ctx: &AppContext, method: &str, path: &str) -> (StatusCode, Value) {
    let response = warp::test::request()
        .method(method)
        .path(path)
        .reply(&routes(ctx))
        .await;
    let body = serde_json::from_slice(response.body()).expect("json body");
    (response.status(), body)
}

pub async fn get(ctx: &AppContext, path: &str) -> (StatusCode, Value) {
    call(ctx, "GET", path).await
}

pub async fn post(ctx: &AppContext, path: &str) -> (StatusCode, Value) {
    call(ctx, "POST", path).await
}

pub fn ids(cards: &Value) -> Vec<i64> {
    cards
        .as_array()
        .expect("card array")
        .iter()
        .map(|card| card["id"].as_i64().expect("card id"))
        .collect()
}
