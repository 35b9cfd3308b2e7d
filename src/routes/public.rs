use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without credentials. Anonymous callers may list
/// public entries and read any individual public entry; the single-entry
/// route also serves owners reading their own private entries, which is why
/// it resolves an *optional* principal instead of requiring one.
///
/// Security Mandate:
/// The public listing must enforce `is_public = true` at the repository
/// level, and the single-entry handler must run the ownership/visibility
/// guard before releasing data.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /scrapbook/public
        // Lists every public entry, newest first. Identical output for every
        // caller; the requesting principal plays no part.
        .route("/scrapbook/public", get(handlers::list_public_entries))
        // GET /scrapbook/{id}
        // Retrieves one entry. Public entries are open to anyone; private
        // entries only to their owner (guard-decided).
        .route("/scrapbook/{id}", get(handlers::get_entry))
}
