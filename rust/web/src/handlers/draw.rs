use super::{json_response, run_blocking};
use std::sync::Arc;
use tarot_engine::draw::{self, DrawParams};
use tarot_engine::CardStore;
use warp::reply::Response;

/// `POST /draw?count=N`: `N` distinct cards in the order they were drawn.
pub async fn draw_cards(store: Arc<dyn CardStore>, params: DrawParams) -> Response {
    json_response(
        run_blocking(move || {
            let count = draw::parse_count(params.count.as_deref())?;
            let mut rng = draw::request_rng(None);
            draw::draw_cards(store.as_ref(), count, &mut rng)
        })
        .await,
    )
}
