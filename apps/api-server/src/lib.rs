//! # Board API Server
//!
//! Actix-web application: routes, middleware and shared state. The binary in
//! `main.rs` wires these together with configuration and the database.

use std::sync::Arc;

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use board_core::ports::RateLimiter;
use tracing_actix_web::TracingLogger;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use state::AppState;

use middleware::headers::{RequestIdHeader, security_headers};
use middleware::panic::CatchPanic;
use middleware::rate_limit::RateLimitMiddleware;

/// Assemble the application with its full middleware stack.
///
/// Outermost first: request tracing, request id echo, security headers, rate
/// limiting, panic recovery.
pub fn build_app(
    state: web::Data<AppState>,
    limiter: Option<Arc<dyn RateLimiter>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .configure(handlers::configure_routes)
        .wrap(CatchPanic)
        .wrap(RateLimitMiddleware::new(limiter))
        .wrap(security_headers())
        .wrap(RequestIdHeader)
        .wrap(TracingLogger::default())
}
