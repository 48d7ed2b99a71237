//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - stores(code, name, address, zone, region, contacts, email, notes)
//! - screens(store_id, brand, reference, inches, orientation, position, input_port, status)
//! - assets(store_id, asset_type, brand_model, serial, lot, position, status)
//! - history(store_id, ticket_code, issue_date, issue_desc, resolution, status, technician)
//!
//! Child tables cascade on store deletion through foreign keys, which are
//! switched on for every connection.

pub mod schema;
pub mod migrate;
pub mod sqlite;

pub use migrate::MigrationReport;
pub use sqlite::{Database, DbStats};
