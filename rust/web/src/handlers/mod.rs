pub mod cards;
pub mod daily;
pub mod draw;
pub mod health;
pub mod yesno;

pub use cards::{get_card, list_cards};
pub use daily::daily_card;
pub use draw::draw_cards;
pub use health::health;
pub use yesno::yes_no;

use crate::errors::{ApiError, IntoErrorResponse};
use serde::Serialize;
use tarot_engine::SelectionError;
use warp::reply::{self, Response};
use warp::Reply;

/// Run a store-bound operation on the blocking pool.
pub(crate) async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, SelectionError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(op).await??)
}

pub(crate) fn json_response<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(body) => reply::json(&body).into_response(),
        Err(err) => err.into_http_response(),
    }
}
