//! Read-only HTML front-end for the machine-info database.
//!
//! This crate provides an Axum HTTP server that serves:
//!
//! - **Machine pages** (`/machine/<shortname>`) with the machine's
//!   details, its parents, the devices it references and the machines
//!   that reference it
//! - **Source file pages** (`/sourcefile/...`) listing all source files,
//!   the files below a directory, or the machines in one file
//! - **Static assets** (`/static/<name>`) such as the stylesheet and the
//!   table sorting script
//!
//! # Architecture
//!
//! A single dispatcher takes the first path segment and hands the request
//! to one handler. The handler validates the request and commits the
//! status and headers; the page body is a lazy stream that queries the
//! database and renders HTML fragments only as the response is written.
//!
//! # Modules
//!
//! - [`router`] -- Router construction and dispatch
//! - [`handlers`] -- Per-path validation and page selection
//! - [`pages`] -- Lazy page bodies
//! - [`templates`] -- HTML fragments
//! - [`assets`] / [`mime`] -- Static asset lookup and content types
//! - [`links`] / [`path`] / [`escape`] -- URL and HTML helpers

pub mod assets;
pub mod context;
pub mod error;
pub mod escape;
pub mod handlers;
pub mod links;
pub mod mime;
pub mod pages;
pub mod path;
pub mod response;
pub mod router;
pub mod server;
pub mod state;
pub mod templates;

// Re-export primary types for convenience.
pub use assets::{AssetResolver, DEFAULT_ASSETS_DIR};
pub use error::WebError;
pub use mime::MimeRegistry;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
