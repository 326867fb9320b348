use crate::config::ServerConfig;
use crate::errors::{ErrorResponse, BAD_REQUEST_MESSAGE, INTERNAL_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
use crate::handlers;
use crate::middleware::with_request_logging;
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use tarot_engine::daily::{DailyParams, DailyVariant};
use tarot_engine::draw::DrawParams;
use tarot_engine::query::ListParams;
use tarot_engine::{CardStore, StoreError};
use tarot_store::SqliteCardStore;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::cors::CorsForbidden;
use warp::filters::BoxedFilter;
use warp::http::{Method, StatusCode};
use warp::reject::{InvalidHeader, InvalidQuery, MethodNotAllowed, PayloadTooLarge};
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

#[derive(Clone)]
pub struct AppContext {
    config: ServerConfig,
    store: Arc<dyn CardStore>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Open the SQLite store named by the configured database URL.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let store = SqliteCardStore::open(config.database_url())?;
        tracing::info!(path = %store.path().display(), "using sqlite card store");
        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn CardStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn CardStore> {
        Arc::clone(&self.store)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Ok(Self::from_context(AppContext::new(config)?))
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let bind_addr = Self::bind_addr(context.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes(&context))
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(%addr, "card api listening");

        let task = tokio::spawn(server_future);

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        let mut source = err.source();
        while let Some(inner) = source {
            if let Some(io_err) = inner.downcast_ref::<std::io::Error>() {
                return ServerError::BindError(std::io::Error::new(
                    io_err.kind(),
                    io_err.to_string(),
                ));
            }
            source = inner.source();
        }

        ServerError::ConfigError(err.to_string())
    }
}

/// The full HTTP surface: card routes, CORS, rejection recovery and request logging.
pub fn routes(context: &AppContext) -> BoxedFilter<(Response,)> {
    let api = health_route()
        .or(card_routes(context))
        .unify()
        .or(draw_route(context))
        .unify()
        .or(daily_route(context))
        .unify()
        .or(yesno_route(context))
        .unify()
        .with(cors(context.config()))
        .map(Reply::into_response)
        .recover(handle_rejection)
        .unify()
        .boxed();

    with_request_logging(api)
}

fn cors(config: &ServerConfig) -> warp::filters::cors::Builder {
    warp::cors()
        .allow_origins(config.cors_origins().iter().map(String::as_str))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(["content-type", "x-request-id"])
        .expose_headers(["x-request-id"])
}

fn health_route() -> BoxedFilter<(Response,)> {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| handlers::health().into_response())
        .boxed()
}

fn card_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
    let store = context.store();

    let list = warp::path("cards")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ListParams>())
        .and(with_store(store.clone()))
        .then(|params: ListParams, store: Arc<dyn CardStore>| handlers::list_cards(store, params));

    let by_id = warp::path!("cards" / i64)
        .and(warp::get())
        .and(with_store(store))
        .then(|id: i64, store: Arc<dyn CardStore>| handlers::get_card(store, id));

    list.or(by_id).unify().boxed()
}

fn draw_route(context: &AppContext) -> BoxedFilter<(Response,)> {
    warp::path("draw")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::query::<DrawParams>())
        .and(with_store(context.store()))
        .then(|params: DrawParams, store: Arc<dyn CardStore>| handlers::draw_cards(store, params))
        .boxed()
}

fn daily_route(context: &AppContext) -> BoxedFilter<(Response,)> {
    let variant = context.config().daily_variant();

    warp::path("daily")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<DailyParams>())
        .and(with_store(context.store()))
        .and(warp::any().map(move || variant))
        .then(
            |params: DailyParams, store: Arc<dyn CardStore>, variant: DailyVariant| {
                handlers::daily_card(store, variant, params)
            },
        )
        .boxed()
}

fn yesno_route(context: &AppContext) -> BoxedFilter<(Response,)> {
    warp::path("yesno")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(context.store()))
        .then(handlers::yes_no)
        .boxed()
}

fn with_store(
    store: Arc<dyn CardStore>,
) -> impl Filter<Extract = (Arc<dyn CardStore>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&store))
}

/// Turn unmatched or malformed requests into `{"error": ...}` bodies.
pub async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    } else if rejection.find::<InvalidQuery>().is_some()
        || rejection.find::<InvalidHeader>().is_some()
        || rejection.find::<PayloadTooLarge>().is_some()
    {
        (StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE)
    } else if rejection.find::<MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else if rejection.find::<CorsForbidden>().is_some() {
        (StatusCode::FORBIDDEN, "Forbidden")
    } else {
        tracing::error!(?rejection, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    };

    Ok(ErrorResponse::new(message).into_response(status))
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<()>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.await
                .map_err(|err| ServerError::ConfigError(format!("server task join error: {err}")))?;
        }

        tracing::info!(addr = %self.addr, "card api stopped");
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
