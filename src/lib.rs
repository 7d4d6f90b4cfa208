//! Folio - a headless model of a portfolio "project cards" page.
//!
//! The crate is split along the page's three cooperating components:
//! - [`store`] - the canonical project records and their queries
//! - [`cards`] - the card interaction coordinator (expansion, filters, selection)
//! - [`a11y`] - the accessibility coordinator (live region, focus, ARIA upkeep)
//!
//! [`page`] wires them together behind a single event entry point and
//! [`dom`] holds the element tree the page projects its state onto.

pub mod a11y;
pub mod cards;
#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod commands;
pub mod config;
pub mod dom;
pub mod input;
pub mod models;
pub mod page;
pub mod store;
#[cfg(feature = "wasm")]
pub mod wasm;

use cards::CardKey;

/// Library-level error type for Folio operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] kdl::KdlError),

    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(CardKey),

    #[error("Duplicate project id: {0}")]
    DuplicateId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Folio operations.
pub type Result<T> = std::result::Result<T, Error>;
