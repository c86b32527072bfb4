//! Error types for the `minimaws` binary.
//!
//! Each subsystem's error converts into [`AppError`] so `main` can
//! propagate everything with `?`.

use minimaws_db::DbError;
use minimaws_web::{ServerError, WebError};

use crate::config::ConfigError;

/// Errors that end a `minimaws` run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The machine database could not be opened or queried.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// The page server could not be set up.
    #[error("web error: {0}")]
    Web(#[from] WebError),

    /// The page server failed to bind or serve.
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// Listing output could not be written.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
