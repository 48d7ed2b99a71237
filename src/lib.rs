//! # Storecard - store equipment and support history records
//!
//! Storecard keeps a small SQLite database describing retail stores:
//! - Stores with their location and contact details
//! - Screens and other hardware assets installed at each store
//! - A support ticket history per store
//! - Printable A4 record sheets (PDF) per store
//!
//! The schema is upgraded in place on open, so databases written by older
//! releases keep working.

pub mod fields;
pub mod store;
pub mod screen;
pub mod asset;
pub mod history;
pub mod storage;
pub mod report;
pub mod config;
pub mod ui;


// Re-exports for convenient access
pub use store::{Contact, Store, StoreInput};
pub use screen::{InputPort, Orientation, Screen, ScreenInput, ScreenStatus};
pub use asset::{Asset, AssetInput, AssetStatus, AssetType};
pub use history::{EntryDate, HistoryEntry, HistoryInput, TicketStatus};
pub use storage::Database;
pub use report::{render_store_report, RenderSummary, StoreReport};

/// Result type alias for Storecard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Storecard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a store with code `{0}` already exists")]
    DuplicateCode(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("schema migration step `{step}` failed: {source}")]
    Migration {
        step: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Error::NotFound { entity, id }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }
}
