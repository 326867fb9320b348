use super::{json_response, run_blocking};
use std::sync::Arc;
use tarot_engine::query::{self, ListParams, ListRequest};
use tarot_engine::CardStore;
use warp::reply::Response;

/// `GET /cards`: filtered, id-ordered page of cards.
///
/// Query parameters `arcana` and `suit` match exactly ignoring case, `q` is a
/// case-insensitive substring of the name. `limit` defaults to 100 and must be
/// at least 1; `offset` defaults to 0 and must not be negative.
pub async fn list_cards(store: Arc<dyn CardStore>, params: ListParams) -> Response {
    json_response(
        run_blocking(move || {
            let request = ListRequest::from_params(params)?;
            query::list_cards(store.as_ref(), &request)
        })
        .await,
    )
}

/// `GET /cards/{id}`
pub async fn get_card(store: Arc<dyn CardStore>, id: i64) -> Response {
    json_response(run_blocking(move || query::get_card(store.as_ref(), id)).await)
}
