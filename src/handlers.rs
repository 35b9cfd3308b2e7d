use crate::{
    AppState,
    auth::{MaybePrincipal, Principal},
    error::ApiError,
    guard::{self, AccessDecision, EntryAction, Role},
    models::{CreateEntryRequest, EntryResponse, MessageResponse, ScrapbookEntry},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::collections::HashMap;
use uuid::Uuid;

// --- Shared gates and mapping ---

/// require_base_role
///
/// The role gate for actions open to registered users. USER and ADMIN are
/// tested explicitly as alternatives, since neither role implies the other
/// in the closed-enumeration role model. A principal that verified but
/// carries neither role is authenticated-yet-unpermitted, hence FORBIDDEN
/// rather than AUTH_REQUIRED.
fn require_base_role(principal: &Principal) -> Result<(), ApiError> {
    if guard::has_role(principal, Role::User) || guard::has_role(principal, Role::Admin) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// enrich_entries
///
/// Maps persisted entries to their wire shape, attaching the owners' display
/// data from the user directory. Lookups are memoized per owner so a listing
/// touches the directory once per distinct user.
async fn enrich_entries(state: &AppState, entries: Vec<ScrapbookEntry>) -> Vec<EntryResponse> {
    let mut profiles = HashMap::new();
    let mut responses = Vec::with_capacity(entries.len());

    for entry in entries {
        let owner_id = entry.user_id;
        if !profiles.contains_key(&owner_id) {
            profiles.insert(owner_id, state.repo.get_user(owner_id).await);
        }
        let owner = profiles.get(&owner_id).and_then(|p| p.as_ref());
        responses.push(EntryResponse::from_entry(entry, owner));
    }

    responses
}

// --- Handlers ---

/// list_my_entries
///
/// [Authenticated Route] Lists every entry owned by the requesting user,
/// private and public alike, newest first. The query is scoped strictly by
/// owner id (visibility never filters a user's own listing) and never
/// returns another user's entries.
#[utoipa::path(
    get,
    path = "/scrapbook",
    responses(
        (status = 200, description = "My entries", body = [EntryResponse]),
        (status = 401, description = "Authentication required", body = MessageResponse)
    )
)]
pub async fn list_my_entries(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    require_base_role(&principal)?;

    let entries = state.repo.get_entries_by_owner(principal.id).await?;
    Ok(Json(enrich_entries(&state, entries).await))
}

/// list_public_entries
///
/// [Public Route] Lists public entries for anyone, anonymous callers
/// included, newest first. The repository applies the `is_public = true`
/// filter unconditionally; the result never depends on who is asking.
#[utoipa::path(
    get,
    path = "/scrapbook/public",
    responses((status = 200, description = "Public entries", body = [EntryResponse]))
)]
pub async fn list_public_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let entries = state.repo.get_public_entries().await?;
    Ok(Json(enrich_entries(&state, entries).await))
}

/// create_entry
///
/// [Authenticated Route] Posts a new scrapbook entry. The owner is always
/// the authenticated principal (the payload cannot name one) and the entry
/// is private unless the payload explicitly requests public visibility.
#[utoipa::path(
    post,
    path = "/scrapbook",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Created", body = EntryResponse),
        (status = 400, description = "Invalid payload", body = MessageResponse),
        (status = 401, description = "Authentication required", body = MessageResponse)
    )
)]
pub async fn create_entry(
    principal: Principal,
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    require_base_role(&principal)?;
    payload.validate().map_err(ApiError::Validation)?;

    let entry = state.repo.create_entry(payload, principal.id).await?;
    let owner = state.repo.get_user(entry.user_id).await;

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse::from_entry(entry, owner.as_ref())),
    ))
}

/// get_entry
///
/// [Public Route] Retrieves a single entry by id. Anonymous callers may read
/// public entries; private entries are readable by their owner only.
/// Existence is resolved before permission, so a missing id is always 404
/// no matter who asks, and a private entry is 403 only once it is known to
/// exist.
#[utoipa::path(
    get,
    path = "/scrapbook/{id}",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Found", body = EntryResponse),
        (status = 403, description = "Not permitted", body = MessageResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    )
)]
pub async fn get_entry(
    MaybePrincipal(principal): MaybePrincipal,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state.repo.get_entry(id).await?;

    match guard::authorize(principal.as_ref(), entry.as_ref(), EntryAction::Read) {
        AccessDecision::Allow => {}
        AccessDecision::DenyNotFound => return Err(ApiError::NotFound),
        AccessDecision::DenyForbidden => return Err(ApiError::Forbidden),
    }

    // Allow implies the entry was present.
    let entry = entry.ok_or(ApiError::NotFound)?;
    let owner = state.repo.get_user(entry.user_id).await;
    Ok(Json(EntryResponse::from_entry(entry, owner.as_ref())))
}

/// delete_entry
///
/// [Authenticated Route] Deletes an entry under the owner-or-admin rule:
/// the owner may always remove their own entry, and an admin may remove
/// anyone's. Visibility plays no part in the decision. Nothing is touched in
/// the store on a deny.
#[utoipa::path(
    delete,
    path = "/scrapbook/{id}",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 401, description = "Authentication required", body = MessageResponse),
        (status = 403, description = "Not owner or admin", body = MessageResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    )
)]
pub async fn delete_entry(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_base_role(&principal)?;

    let entry = state.repo.get_entry(id).await?;

    match guard::authorize(Some(&principal), entry.as_ref(), EntryAction::Delete) {
        AccessDecision::Allow => {}
        AccessDecision::DenyNotFound => return Err(ApiError::NotFound),
        AccessDecision::DenyForbidden => return Err(ApiError::Forbidden),
    }

    // The guard allowed the delete; a zero-row result means the entry was
    // removed concurrently, which reads as NOT_FOUND to this caller.
    if !state.repo.delete_entry(id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(Json(MessageResponse {
        message: "Entry deleted successfully!".to_string(),
    }))
}
