//! Shared application state for the page server.
//!
//! [`AppState`] holds everything a handler needs that outlives a single
//! request: the database pool, the asset resolver and the compiled
//! templates. It is built once at startup and injected via Axum's `State`
//! extractor; nothing in it is mutated while serving.

use std::sync::Arc;

use minimaws_db::DatabasePool;

use crate::assets::AssetResolver;
use crate::templates::PageTemplates;

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Read-only machine database.
    pub db: DatabasePool,
    /// Static asset lookup.
    pub assets: AssetResolver,
    /// Compiled page fragments.
    pub templates: Arc<PageTemplates>,
    /// Base URI for generated links. When unset, links are built from the
    /// request's `Host` header.
    pub public_uri: Option<String>,
}

impl AppState {
    /// Create the application state, compiling the page templates.
    ///
    /// # Errors
    ///
    /// Returns the template compile error if a built-in fragment is
    /// malformed.
    pub fn new(db: DatabasePool, assets: AssetResolver) -> Result<Self, minijinja::Error> {
        Ok(Self {
            db,
            assets,
            templates: Arc::new(PageTemplates::new()?),
            public_uri: None,
        })
    }

    /// Use a fixed base URI for generated links.
    #[must_use]
    pub fn with_public_uri(mut self, uri: impl Into<String>) -> Self {
        self.public_uri = Some(uri.into());
        self
    }
}
