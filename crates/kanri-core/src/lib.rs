//! View-state controllers for the catalog console.
//!
//! Screens are plain state machines: `update(Message) -> Action`. The
//! [`app::App`] router interprets actions and hands the remaining I/O
//! [`effect::Effect`]s to a [`runtime::Runtime`], which runs them against a
//! [`kanri_api::CatalogService`] and feeds the results back as messages.

pub mod app;
pub mod chips;
pub mod config;
pub mod debounce;
pub mod effect;
pub mod error;
pub mod pagination;
pub mod runtime;
pub mod screen;
pub mod toast;

pub use app::App;
pub use config::AppConfig;
pub use error::CoreError;
pub use runtime::Runtime;
