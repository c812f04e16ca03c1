//! HTTP surface: the status page and a liveness endpoint.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, serve};
