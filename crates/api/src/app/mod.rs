//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared dependencies (the user gateway)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and the body codec
//! - `errors.rs`: error taxonomy and consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// `services` is constructed once by the caller; no handler reaches for a
/// global store.
pub fn build_app(services: AppServices) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::log_requests))
            .layer(Extension(Arc::new(services))),
    )
}
