//! HTTP server module
//!
//! Routing, request handlers and middleware. The handlers are thin: request
//! parsing and status mapping live in `ytsubs_lib::service` so the gateway
//! function behaves the same way.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
