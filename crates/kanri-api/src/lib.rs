//! Typed client for the catalog HTTP API.
//!
//! The server owns persistence and business rules; this crate only maps
//! endpoints to Rust calls and normalizes the wire shapes.

pub mod client;
pub mod error;
pub mod query;
pub mod traits;
pub mod types;

pub use client::CatalogClient;
pub use error::ApiError;
pub use query::{AnimeFilter, FollowQuery, PageRequest, SortOrder};
pub use traits::CatalogService;
