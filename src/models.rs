use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::guard::Visibility;

// --- Core Application Schemas (Mapped to Database) ---

/// ScrapbookEntry
///
/// The canonical persisted content record from the `public.scrapbook_entries`
/// table. This is the only shape the guard ever evaluates; it is mapped to
/// `EntryResponse` before leaving the service and never serves as a request
/// payload itself.
///
/// `user_id` is the owner, assigned exactly once at creation from the
/// authenticated principal and immutable thereafter (no update action exists).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ScrapbookEntry {
    pub id: Uuid,
    // FK to public.users.id (Owner). Set once at creation.
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub location: Option<String>,
    // Read eligibility flag. False (private) unless explicitly requested
    // public at creation; immutable afterwards.
    pub is_public: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl ScrapbookEntry {
    /// Typed view of the stored visibility flag, consumed by the guard.
    pub fn visibility(&self) -> Visibility {
        if self.is_public {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

/// UserProfile
///
/// The user directory record from `public.users`. Used only to enrich entry
/// responses with display data; authorization never consults it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

// --- Request Payloads (Input Schemas) ---

/// CreateEntryRequest
///
/// Input payload for posting a new scrapbook entry (POST /scrapbook).
/// The owner is never part of the payload; it is taken from the
/// authenticated principal. `is_public` defaults to false, so entries are
/// private unless the client explicitly asks otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateEntryRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl CreateEntryRequest {
    /// Field-level checks for the create payload. Limits match the original
    /// schema: title and location are capped at 100 characters.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title must not be blank.".to_string());
        }
        if self.title.chars().count() > 100 {
            return Err("Title must not exceed 100 characters.".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("Content must not be blank.".to_string());
        }
        if let Some(location) = &self.location {
            if location.chars().count() > 100 {
                return Err("Location must not exceed 100 characters.".to_string());
            }
        }
        Ok(())
    }
}

// --- Response Schemas (Output) ---

/// UserInfo
///
/// Display-only projection of the entry owner, embedded in `EntryResponse`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// EntryResponse
///
/// The external representation of a scrapbook entry. Mapped explicitly from
/// the persisted `ScrapbookEntry` so the wire shape can carry the owner's
/// display data without exposing the raw entity.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct EntryResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub is_public: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    // None when the owner's directory record is missing; the entry itself
    // is still returned.
    pub user: Option<UserInfo>,
}

impl EntryResponse {
    /// Maps the persisted entry plus its (optional) directory record into
    /// the wire shape.
    pub fn from_entry(entry: ScrapbookEntry, owner: Option<&UserProfile>) -> Self {
        EntryResponse {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            image_url: entry.image_url,
            location: entry.location,
            is_public: entry.is_public,
            created_at: entry.created_at,
            user: owner.map(|u| UserInfo {
                id: u.id,
                username: u.username.clone(),
                name: u.name.clone(),
            }),
        }
    }
}

/// MessageResponse
///
/// Stable human-readable outcome envelope used for success confirmations and
/// every error body. Clients rely on the message text being consistent per
/// outcome kind.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}
