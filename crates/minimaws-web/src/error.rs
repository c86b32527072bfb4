//! Error types for the page server.
//!
//! [`WebError`] covers failures that are not the client's fault. The
//! dispatcher turns any of them into a rendered 500 page; clients never see
//! the error text.

use std::io;
use std::path::PathBuf;

use axum::http::StatusCode;
use minimaws_db::DbError;

/// Errors that can occur while producing a page.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// A data-access query failed.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// A page fragment failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A resolved static asset could not be opened.
    #[error("failed to open asset {}: {source}", path.display())]
    AssetOpen {
        /// Path of the asset on disk.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl WebError {
    /// Status code reported to the client for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Template(_) | Self::AssetOpen { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
