//! HTTP surface for the tarot card API.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;

pub use config::{ConfigError, ConfigResolved, ServerConfig, ValueSource};
pub use errors::{ApiError, ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{init_logging, CapturedEvent, LogCapture, LogFormat};
pub use middleware::{log_response, with_request_logging};
pub use server::{routes, AppContext, ServerError, ServerHandle, WebServer};
