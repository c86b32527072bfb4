//! `/sourcefile[/<path>]`: source file listings and detail pages.
//!
//! The whole remaining path names the file. With no name, every source
//! file is listed. A name that is not a file but is a directory prefix of
//! some files lists those files instead.

use super::{Rejection, Reply, page_context, require_get};
use crate::context::RequestContext;
use crate::state::AppState;

/// Serve a source file page or listing.
///
/// # Errors
///
/// Returns a [`Rejection`] for an unknown file that is not a directory
/// prefix either, a name containing glob wildcards that does not match a
/// file exactly (404), a method other than `GET` (405), or a failed lookup.
pub async fn handle(state: &AppState, ctx: RequestContext) -> Result<Reply, Rejection> {
    let remaining = ctx.path.remaining();
    let filename = remaining.strip_prefix('/').unwrap_or(remaining).to_owned();

    if filename.is_empty() {
        require_get(&ctx)?;
        return Ok(Reply::Page(page_context(state, ctx).sourcefile_listing(None)));
    }

    let store = state.db.sourcefiles();
    if let Some(id) = store.sourcefile_id(&filename).await? {
        require_get(&ctx)?;
        return Ok(Reply::Page(page_context(state, ctx).sourcefile(filename, id)));
    }

    let pattern = prefix_pattern(&filename).ok_or(Rejection::NOT_FOUND)?;
    if store.count_sourcefiles(&pattern).await? == 0 {
        return Err(Rejection::NOT_FOUND);
    }
    require_get(&ctx)?;

    Ok(Reply::Page(page_context(state, ctx).sourcefile_listing(Some(pattern))))
}

/// Glob pattern matching every file below `name` treated as a directory.
///
/// Names that already contain a wildcard get no pattern.
fn prefix_pattern(name: &str) -> Option<String> {
    if name.contains(['*', '?']) {
        None
    } else if name.ends_with('/') {
        Some(format!("{name}*"))
    } else {
        Some(format!("{name}/*"))
    }
}
