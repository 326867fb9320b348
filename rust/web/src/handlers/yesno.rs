use super::{json_response, run_blocking};
use std::sync::Arc;
use tarot_engine::draw::request_rng;
use tarot_engine::{yesno, CardStore};
use warp::reply::Response;

/// `GET /yesno`: one random card and the answer it gives.
pub async fn yes_no(store: Arc<dyn CardStore>) -> Response {
    json_response(
        run_blocking(move || {
            let mut rng = request_rng(None);
            yesno::yes_no(store.as_ref(), &mut rng)
        })
        .await,
    )
}
