//! Read-only data layer for the minimaws machine-info browser.
//!
//! The machine database is a `SQLite` file built offline from the
//! emulator's machine list. This crate opens it read-only and exposes the
//! handful of parameterized queries the web pages and command-line
//! listings need.
//!
//! # Modules
//!
//! - [`sqlite`] -- Connection pool and configuration
//! - [`machine_store`] -- Machine detail and device reference queries
//! - [`sourcefile_store`] -- Source file lookup and listing queries
//! - [`listing_store`] -- Glob-pattern listings for the command line
//! - [`error`] -- Shared error types

pub mod error;
pub mod listing_store;
pub mod machine_store;
pub mod sourcefile_store;
pub mod sqlite;

// Re-export primary types for convenience.
pub use error::DbError;
pub use listing_store::ListingStore;
pub use machine_store::MachineStore;
pub use sourcefile_store::SourceFileStore;
pub use sqlite::{DatabaseConfig, DatabasePool};
