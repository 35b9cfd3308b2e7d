use crate::models::{CreateEntryRequest, ScrapbookEntry, UserProfile};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for the two persistence collaborators the
/// authorization core depends on: the entry store and the user directory.
/// Handlers interact with this trait only, never with a concrete backend,
/// which is what lets the guard and operation layer be tested against a mock.
///
/// Entry-store methods surface backend failures as `Err`: an unreachable
/// store is a fatal condition for the current action (it becomes a 500 at
/// the surface), distinct from `Ok(None)` / zero rows, which mean the id
/// simply does not resolve (404).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Entry Store ---

    /// Fetches a single entry by id with no visibility filter. Existence is
    /// resolved here; permission is the guard's job afterwards.
    async fn get_entry(&self, id: Uuid) -> Result<Option<ScrapbookEntry>, sqlx::Error>;

    /// All entries owned by `owner_id`, private and public alike,
    /// most-recently-created first.
    async fn get_entries_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<ScrapbookEntry>, sqlx::Error>;

    /// Public entries only, most-recently-created first. Never depends on
    /// the requesting principal.
    async fn get_public_entries(&self) -> Result<Vec<ScrapbookEntry>, sqlx::Error>;

    /// Inserts a new entry owned by `owner_id`. The store assigns the id and
    /// creation timestamp.
    async fn create_entry(
        &self,
        req: CreateEntryRequest,
        owner_id: Uuid,
    ) -> Result<ScrapbookEntry, sqlx::Error>;

    /// Deletes by id, unconditionally; the guard has already decided. True
    /// iff a row was removed (false when the entry vanished in a race).
    async fn delete_entry(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- User Directory ---

    /// Directory lookup for response enrichment (display name/username).
    /// Never consulted for authorization decisions, and best-effort: a
    /// failed lookup degrades to `None` so the entry itself is still served.
    async fn get_user(&self, id: Uuid) -> Option<UserProfile>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by
/// PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ENTRY_COLUMNS: &str =
    "id, user_id, title, content, image_url, location, is_public, created_at";

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_entry(&self, id: Uuid) -> Result<Option<ScrapbookEntry>, sqlx::Error> {
        let query = format!("SELECT {ENTRY_COLUMNS} FROM scrapbook_entries WHERE id = $1");
        sqlx::query_as::<_, ScrapbookEntry>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_entries_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<ScrapbookEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM scrapbook_entries \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ScrapbookEntry>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
    }

    /// **Security**: strictly enforces `WHERE is_public = true`; a private
    /// entry can never appear in this listing regardless of the caller.
    async fn get_public_entries(&self) -> Result<Vec<ScrapbookEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM scrapbook_entries \
             WHERE is_public = true ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ScrapbookEntry>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn create_entry(
        &self,
        req: CreateEntryRequest,
        owner_id: Uuid,
    ) -> Result<ScrapbookEntry, sqlx::Error> {
        let new_id = Uuid::new_v4();
        let query = format!(
            "INSERT INTO scrapbook_entries \
             (id, user_id, title, content, image_url, location, is_public, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             RETURNING {ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, ScrapbookEntry>(&query)
            .bind(new_id)
            .bind(owner_id)
            .bind(req.title)
            .bind(req.content)
            .bind(req.image_url)
            .bind(req.location)
            .bind(req.is_public)
            .fetch_one(&self.pool)
            .await
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scrapbook_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, id: Uuid) -> Option<UserProfile> {
        sqlx::query_as::<_, UserProfile>("SELECT id, username, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }
}
