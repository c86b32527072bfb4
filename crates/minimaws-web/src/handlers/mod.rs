//! Request handlers, one per top-level path segment.
//!
//! | Path | Handler |
//! |------|---------|
//! | `/machine/<shortname>` | [`machine`] |
//! | `/sourcefile[/<path or prefix>]` | [`sourcefile`] |
//! | `/static/<asset>` | [`asset`] |
//! | `/` | 403 |
//! | anything else | 404 |
//!
//! Handlers check, in order: the identifier is present (403), nothing
//! follows it (404), the target exists (404), the method is `GET` (405).
//! The first failing check decides the response.

pub mod asset;
pub mod machine;
pub mod sourcefile;

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;
use futures::TryStreamExt;
use minimaws_db::DbError;

use crate::context::RequestContext;
use crate::error::WebError;
use crate::pages::{PageContext, PageStream};
use crate::response::{HTML_CONTENT_TYPE, error_page, with_headers};
use crate::state::AppState;

/// The handler chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Machine detail pages.
    Machine,
    /// Source file listings and detail pages.
    SourceFile,
    /// Files from the assets directory.
    StaticAsset,
    /// A fixed error response.
    Error(StatusCode),
}

impl Route {
    /// Choose the handler for the first path segment.
    pub fn select(segment: Option<&str>) -> Self {
        match segment {
            Some("machine") => Self::Machine,
            Some("sourcefile") => Self::SourceFile,
            Some("static") => Self::StaticAsset,
            None | Some("") => Self::Error(StatusCode::FORBIDDEN),
            Some(_) => Self::Error(StatusCode::NOT_FOUND),
        }
    }

    /// Run the handler and produce the response.
    ///
    /// The status and headers are fixed here; page bodies are generated
    /// later, while the response is being written.
    pub async fn respond(self, state: &AppState, ctx: RequestContext) -> Response {
        let outcome = match self {
            Self::Machine => machine::handle(state, ctx).await,
            Self::SourceFile => sourcefile::handle(state, ctx).await,
            Self::StaticAsset => asset::handle(state, ctx).await,
            Self::Error(status) => Err(Rejection::Status(status)),
        };

        match outcome {
            Ok(reply) => reply.finish(),
            Err(Rejection::Status(status)) => error_page(&state.templates, status),
            Err(Rejection::Failed(e)) => {
                tracing::error!(error = %e, route = ?self, "Request failed");
                error_page(&state.templates, e.status())
            }
        }
    }
}

/// A successful handler result, before headers are applied.
pub enum Reply {
    /// A generated HTML page.
    Page(PageStream),
    /// A static file.
    Asset {
        /// MIME type of the file.
        content_type: String,
        /// Streamed file contents.
        body: Body,
    },
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page(_) => f.write_str("Page"),
            Self::Asset { content_type, .. } => {
                f.debug_struct("Asset").field("content_type", content_type).finish_non_exhaustive()
            }
        }
    }
}

impl Reply {
    fn finish(self) -> Response {
        match self {
            Self::Page(page) => {
                let page = page.inspect_err(|e| {
                    tracing::error!(error = %e, "Page generation failed after headers were sent");
                });
                with_headers(StatusCode::OK, HTML_CONTENT_TYPE, Body::from_stream(page))
            }
            Self::Asset { content_type, body } => with_headers(StatusCode::OK, &content_type, body),
        }
    }
}

/// Why a handler did not produce a reply.
#[derive(Debug)]
pub enum Rejection {
    /// The request is answered with an error page for this status.
    Status(StatusCode),
    /// Something went wrong on the server side.
    Failed(WebError),
}

impl Rejection {
    /// No identifier was given.
    pub const FORBIDDEN: Self = Self::Status(StatusCode::FORBIDDEN);
    /// The resource or sub-path does not exist.
    pub const NOT_FOUND: Self = Self::Status(StatusCode::NOT_FOUND);
    /// The resource exists but only answers `GET`.
    pub const METHOD_NOT_ALLOWED: Self = Self::Status(StatusCode::METHOD_NOT_ALLOWED);
}

impl From<WebError> for Rejection {
    fn from(e: WebError) -> Self {
        Self::Failed(e)
    }
}

impl From<DbError> for Rejection {
    fn from(e: DbError) -> Self {
        Self::Failed(WebError::Database(e))
    }
}

/// Take the identifier segment off the path.
///
/// A missing or empty identifier is a 403.
fn require_identifier(ctx: &mut RequestContext) -> Result<String, Rejection> {
    match ctx.path.shift() {
        Some(identifier) if !identifier.is_empty() => Ok(identifier),
        _ => Err(Rejection::FORBIDDEN),
    }
}

/// Reject a sub-path of a resource that has none.
fn require_end_of_path(ctx: &RequestContext) -> Result<(), Rejection> {
    if ctx.path.has_remaining() {
        Err(Rejection::NOT_FOUND)
    } else {
        Ok(())
    }
}

fn require_get(ctx: &RequestContext) -> Result<(), Rejection> {
    if ctx.is_get() {
        Ok(())
    } else {
        Err(Rejection::METHOD_NOT_ALLOWED)
    }
}

fn page_context(state: &AppState, ctx: RequestContext) -> PageContext {
    PageContext::new(state.db.clone(), state.templates.clone(), ctx.links)
}
