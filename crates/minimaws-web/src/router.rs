//! Axum router construction for the page server.
//!
//! Routing is done by hand on the first path segment rather than with
//! Axum's path matcher, so that a missing identifier and an unknown
//! sub-path can be told apart and answered with 403 and 404 respectively.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;
use tower_http::trace::TraceLayer;

use crate::context::RequestContext;
use crate::handlers::Route;
use crate::state::AppState;

/// Build the complete Axum router for the page server.
///
/// Every request, whatever its method or path, goes to the dispatcher.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pick a handler from the first path segment and run it.
async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let mut ctx = RequestContext::new(method, &uri, &headers, state.public_uri.as_deref());
    let route = Route::select(ctx.path.shift().as_deref());
    tracing::debug!(
        route_segment = %ctx.path.consumed(),
        remaining = %ctx.path.remaining(),
        query = ?ctx.query,
        ?route,
        "Dispatching request"
    );
    route.respond(&state, ctx).await
}
