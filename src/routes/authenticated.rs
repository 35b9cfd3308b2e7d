use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Authenticated Router Module
///
/// Routes for callers who passed the authentication layer. Every handler
/// here receives the validated `Principal` (id + role set) as an explicit
/// argument and runs its own role gate and, where a single entry is
/// addressed, the ownership guard.
///
/// Access Control Strategy:
/// The `Principal` extractor middleware on this router guarantees a usable
/// identity before any handler runs; unauthenticated requests are rejected
/// with 401 at the layer.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET  /scrapbook
        // Lists the caller's own entries, private and public alike.
        // POST /scrapbook
        // Creates an entry owned by the caller. Private unless the payload
        // explicitly asks for public visibility.
        .route(
            "/scrapbook",
            get(handlers::list_my_entries).post(handlers::create_entry),
        )
        // DELETE /scrapbook/{id}
        // Removes an entry under the owner-or-admin rule. Admins may remove
        // any entry; owners only their own.
        .route("/scrapbook/{id}", delete(handlers::delete_entry))
}
