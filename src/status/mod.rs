//! Status page module.
//!
//! This module handles:
//! - The status snapshot type and its validating parser
//! - The HTTP client for the backend status endpoint
//! - HTML templates for the page and its fallback
//! - The page itself, tying fetch and render together
//! - A scripted snapshot source for tests

pub mod client;
pub mod mock;
pub mod page;
pub mod render;
pub mod types;

pub use client::{SnapshotSource, StatusClient, MAX_BODY_BYTES};
pub use mock::{MockResponse, MockSnapshotSource};
pub use page::{RenderedPage, StatusPage};
pub use types::StatusSnapshot;
