use super::{json_response, run_blocking};
use std::sync::Arc;
use tarot_engine::daily::{self, DailyParams, DailyRequest, DailyVariant};
use tarot_engine::CardStore;
use warp::reply::Response;

/// `GET /daily?date=YYYY-MM-DD&seed=S`
///
/// The same date, seed and deck always give the same card. A missing date
/// means today in server-local time.
pub async fn daily_card(
    store: Arc<dyn CardStore>,
    variant: DailyVariant,
    params: DailyParams,
) -> Response {
    json_response(
        run_blocking(move || {
            let request = DailyRequest::from_params(params, daily::today())?;
            let daily = daily::daily_card(store.as_ref(), &request, variant)?;
            tracing::debug!(
                date = %daily.date,
                card_id = daily.card.id,
                variant = %variant,
                "daily card chosen"
            );
            Ok(daily)
        })
        .await,
    )
}
