use std::time::Instant;
use uuid::Uuid;
use warp::filters::BoxedFilter;
use warp::http::header::HeaderValue;
use warp::http::{Method, StatusCode};
use warp::reply::Response;
use warp::Filter;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
struct RequestInfo {
    id: String,
    path: String,
    method: Method,
    start: Instant,
}

/// Wrap `routes` so every response is logged and carries an `x-request-id`.
///
/// A caller-supplied request id is echoed back; otherwise a v4 uuid is minted.
pub fn with_request_logging(routes: BoxedFilter<(Response,)>) -> BoxedFilter<(Response,)> {
    warp::any()
        .and(warp::path::full())
        .and(warp::method())
        .and(warp::header::optional::<String>(REQUEST_ID_HEADER))
        .map(
            |path: warp::path::FullPath, method: Method, id: Option<String>| {
                let id = id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                tracing::debug!(request_id = %id, method = %method, path = %path.as_str(), "incoming request");
                RequestInfo {
                    id,
                    path: path.as_str().to_string(),
                    method,
                    start: Instant::now(),
                }
            },
        )
        .and(routes)
        .map(|info: RequestInfo, mut response: Response| {
            log_response(
                &info.id,
                response.status(),
                &info.path,
                info.method.as_str(),
                info.start.elapsed().as_millis(),
            );
            if let Ok(value) = HeaderValue::from_str(&info.id) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            response
        })
        .boxed()
}

pub fn log_response(request_id: &str, status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    let status = status.as_u16();
    if (500..600).contains(&status) {
        tracing::error!(request_id, status, path, method, duration_ms, "server error");
    } else if (400..500).contains(&status) {
        tracing::warn!(request_id, status, path, method, duration_ms, "client error");
    } else {
        tracing::info!(request_id, status, path, method, duration_ms, "response sent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogCapture;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;
    use warp::Reply;

    fn ok_route() -> BoxedFilter<(Response,)> {
        warp::path!("ping")
            .and(warp::get())
            .map(|| warp::reply::json(&"pong").into_response())
            .boxed()
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let routes = with_request_logging(ok_route());

        let minted = warp::test::request().path("/ping").reply(&routes).await;
        assert_eq!(minted.status(), StatusCode::OK);
        let id = minted.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());

        let echoed = warp::test::request()
            .path("/ping")
            .header(REQUEST_ID_HEADER, "abc-123")
            .reply(&routes)
            .await;
        assert_eq!(echoed.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn completed_requests_are_logged() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(Registry::default().with(capture.layer()));

        let routes = with_request_logging(ok_route());
        warp::test::request()
            .path("/ping")
            .header(REQUEST_ID_HEADER, "req-1")
            .reply(&routes)
            .await;

        let events = capture.events();
        let sent = events
            .iter()
            .find(|e| e.message == "response sent")
            .expect("response log");
        assert_eq!(sent.level, Level::INFO);
        assert_eq!(sent.field("status"), Some("200"));
        assert_eq!(sent.field("request_id"), Some("req-1"));
        assert_eq!(sent.field("path"), Some("/ping"));
    }

    #[test]
    fn status_classes_pick_the_level() {
        let capture = LogCapture::new();
        let registry = Registry::default().with(capture.layer());

        tracing::subscriber::with_default(registry, || {
            log_response("a", StatusCode::NOT_FOUND, "/cards/999", "GET", 3);
            log_response("b", StatusCode::INTERNAL_SERVER_ERROR, "/draw", "POST", 9);
        });

        let events = capture.events();
        assert_eq!(events[0].level, Level::WARN);
        assert_eq!(events[0].message, "client error");
        assert_eq!(events[1].level, Level::ERROR);
        assert_eq!(events[1].message, "server error");
    }
}
