//! Server-rendered crawl status page for Dark Search.
//!
//! Every request to the page fetches a fresh status snapshot from the
//! backend API and renders its counters:
//!
//! ```text
//! GET /  ──►  GET {API_BASE_URL}  ──►  parse + validate  ──►  HTML
//!                     │                      │
//!                     └──── failure ─────────┴──►  fallback page (503)
//! ```
//!
//! Nothing is cached between renders.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`status`]: Snapshot type, backend client, templates and the page
//! - [`api`]: HTTP routes for the page and health checks
//! - [`metrics`]: Render and fetch metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod status;
pub mod utils;

pub use config::Config;
pub use error::{AppError, FailureKind, FetchError, Result};
