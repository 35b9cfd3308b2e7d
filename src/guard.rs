use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{auth::Principal, models::ScrapbookEntry};

/// Role
///
/// The closed set of coarse permission tags a principal can hold. Role checks
/// are plain set membership: `Admin` never implies `User` and `User` never
/// implies `Admin`. Any action open to both must test both explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    User,
    Admin,
}

/// Visibility
///
/// Read eligibility of a scrapbook entry. Derived from the entry's stored
/// `is_public` flag via `ScrapbookEntry::visibility()`. Visibility governs
/// reads only; it has no bearing on delete eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// EntryAction
///
/// The single-resource actions the guard decides on. Create and the two list
/// queries never address an existing entry, so they are gated by role alone
/// in the handler layer and do not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Read,
    Delete,
}

/// AccessDecision
///
/// The outcome of a guarded action. Every evaluation yields exactly one
/// variant; a decision is never silently absent. The two deny variants are
/// expected, non-fatal outcomes the operation layer maps to distinct
/// user-visible errors (403 vs 404), never Rust errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    DenyNotFound,
    DenyForbidden,
}

/// has_role
///
/// Total membership predicate over the principal's role set. Never fails.
pub fn has_role(principal: &Principal, role: Role) -> bool {
    principal.roles.contains(&role)
}

/// authorize
///
/// The ownership/visibility decision core. Pure function of the resolved
/// principal (or `None` for anonymous), the loaded entry (or `None` when the
/// id did not resolve), and the requested action. Performs no I/O and holds
/// no state across calls, so it is unit-testable without a store.
///
/// Existence is always resolved before permission: a missing entry yields
/// `DenyNotFound` no matter who is asking, so probing for ids gets a uniform
/// NOT_FOUND instead of leaking a forbidden-vs-missing distinction.
pub fn authorize(
    principal: Option<&Principal>,
    entry: Option<&ScrapbookEntry>,
    action: EntryAction,
) -> AccessDecision {
    let Some(entry) = entry else {
        return AccessDecision::DenyNotFound;
    };

    match action {
        // Readable when public, or when the requester owns the entry.
        EntryAction::Read => match entry.visibility() {
            Visibility::Public => AccessDecision::Allow,
            Visibility::Private => match principal {
                Some(p) if p.id == entry.user_id => AccessDecision::Allow,
                _ => AccessDecision::DenyForbidden,
            },
        },
        // Deletable by the owner or by any admin, public or not.
        EntryAction::Delete => match principal {
            Some(p) if p.id == entry.user_id || has_role(p, Role::Admin) => {
                AccessDecision::Allow
            }
            _ => AccessDecision::DenyForbidden,
        },
    }
}
