//! HTTP API for the user resource: routing, handlers, and request/response mapping.

pub mod app;
pub mod middleware;
