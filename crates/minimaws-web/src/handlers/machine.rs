//! `/machine/<shortname>`: machine detail pages.

use super::{
    Rejection, Reply, page_context, require_end_of_path, require_get, require_identifier,
};
use crate::context::RequestContext;
use crate::state::AppState;

/// Serve the detail page for one machine.
///
/// # Errors
///
/// Returns a [`Rejection`] for a missing short name (403), a sub-path or
/// unknown machine (404), a method other than `GET` (405), or a failed
/// lookup.
pub async fn handle(state: &AppState, mut ctx: RequestContext) -> Result<Reply, Rejection> {
    let shortname = require_identifier(&mut ctx)?;
    require_end_of_path(&ctx)?;

    let machine = state
        .db
        .machines()
        .machine_info(&shortname)
        .await?
        .ok_or(Rejection::NOT_FOUND)?;
    require_get(&ctx)?;

    Ok(Reply::Page(page_context(state, ctx).machine(machine)))
}
