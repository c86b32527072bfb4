//! `/static/<asset>`: files from the assets directory.

use axum::body::Body;
use futures::TryStreamExt;

use super::{Rejection, Reply, require_end_of_path, require_get, require_identifier};
use crate::context::RequestContext;
use crate::error::WebError;
use crate::state::AppState;

/// Stream a static asset.
///
/// # Errors
///
/// Returns a [`Rejection`] for a missing asset name (403), a sub-path or
/// unknown asset (404), a method other than `GET` (405), or a file that
/// resolved but could not be opened (500).
pub async fn handle(state: &AppState, mut ctx: RequestContext) -> Result<Reply, Rejection> {
    let name = require_identifier(&mut ctx)?;
    require_end_of_path(&ctx)?;

    let asset = state.assets.resolve(&name).await.ok_or(Rejection::NOT_FOUND)?;
    require_get(&ctx)?;

    let chunks = asset.open().await.map_err(|source| WebError::AssetOpen {
        path: asset.path.clone(),
        source,
    })?;
    let path = asset.path.clone();
    let chunks = chunks.inspect_err(move |e| {
        tracing::warn!(path = %path.display(), error = %e, "Asset read failed mid-stream");
    });

    Ok(Reply::Asset {
        content_type: asset.content_type,
        body: Body::from_stream(chunks),
    })
}
