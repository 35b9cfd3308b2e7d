use chrono::{DateTime, Duration, Utc};
use scrapbook_api::{
    models::{CreateEntryRequest, ScrapbookEntry, UserProfile},
    repository::{PostgresRepository, Repository},
};
use sqlx::PgPool;
use tokio::test;
use uuid::Uuid;

// These tests exercise the real PostgreSQL queries and are ignored by
// default. Run them against a disposable database with:
//   DATABASE_URL=postgres://... cargo test -- --ignored

// --- Test Context and Setup ---

/// A simple structure to hold the database pool for testing
struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

/// Inserts a mock user into the directory. Each test creates its own users
/// under fresh UUIDs so runs do not interfere with each other.
async fn create_test_user(pool: &PgPool, name: &str) -> UserProfile {
    let id = Uuid::new_v4();
    let username = format!("{}-{}@test.com", name, id);

    sqlx::query_as::<_, UserProfile>(
        "INSERT INTO users (id, username, name) VALUES ($1, $2, $3) \
         RETURNING id, username, name",
    )
    .bind(id)
    .bind(username)
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("Failed to create test user")
}

/// Inserts an entry directly, with an explicit creation timestamp so
/// ordering can be asserted deterministically.
async fn create_test_entry(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    is_public: bool,
    created_at: DateTime<Utc>,
) -> ScrapbookEntry {
    sqlx::query_as::<_, ScrapbookEntry>(
        "INSERT INTO scrapbook_entries \
         (id, user_id, title, content, image_url, location, is_public, created_at) \
         VALUES ($1, $2, $3, $4, NULL, NULL, $5, $6) \
         RETURNING id, user_id, title, content, image_url, location, is_public, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(title)
    .bind("test content")
    .bind(is_public)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("Failed to create test entry")
}

// --- Tests ---

#[test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_create_and_get_entry() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let user = create_test_user(&ctx.pool, "creator").await;

    let req = CreateEntryRequest {
        title: "Harbour walk".to_string(),
        content: "Photos from the pier.".to_string(),
        image_url: None,
        location: Some("Harbour".to_string()),
        is_public: false,
    };

    // 1. Test Create
    let created = repo
        .create_entry(req.clone(), user.id)
        .await
        .expect("create_entry failed");
    assert_eq!(created.title, req.title);
    assert_eq!(created.user_id, user.id);
    assert!(!created.is_public, "Entries should be private by default");

    // 2. Test Get
    let fetched = repo.get_entry(created.id).await.expect("get_entry failed");
    assert_eq!(fetched.expect("entry should exist").title, req.title);

    // 3. Directory lookup for enrichment
    let profile = repo.get_user(user.id).await.expect("user should exist");
    assert_eq!(profile.name, "creator");
}

#[test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_owner_listing_is_newest_first_and_owner_scoped() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let owner = create_test_user(&ctx.pool, "owner").await;
    let other = create_test_user(&ctx.pool, "other").await;

    let base = Utc::now();
    let oldest = create_test_entry(&ctx.pool, owner.id, "Oldest", false, base - Duration::hours(2)).await;
    let newest = create_test_entry(&ctx.pool, owner.id, "Newest", true, base).await;
    let middle = create_test_entry(&ctx.pool, owner.id, "Middle", false, base - Duration::hours(1)).await;
    create_test_entry(&ctx.pool, other.id, "Not mine", true, base).await;

    let entries = repo
        .get_entries_by_owner(owner.id)
        .await
        .expect("get_entries_by_owner failed");

    // Owner-scoped: exactly the three entries above, none of other's.
    let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
    assert_eq!(
        ids,
        vec![newest.id, middle.id, oldest.id],
        "Owner listing must be most-recently-created first"
    );
    // Both visibilities are present in one's own listing.
    assert!(entries.iter().any(|e| e.is_public));
    assert!(entries.iter().any(|e| !e.is_public));
}

#[test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_public_listing_is_newest_first_and_excludes_private() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let user = create_test_user(&ctx.pool, "publisher").await;

    let base = Utc::now();
    let older_public =
        create_test_entry(&ctx.pool, user.id, "Older public", true, base - Duration::hours(1)).await;
    let newer_public = create_test_entry(&ctx.pool, user.id, "Newer public", true, base).await;
    let private =
        create_test_entry(&ctx.pool, user.id, "Private", false, base + Duration::hours(1)).await;

    let all_public = repo
        .get_public_entries()
        .await
        .expect("get_public_entries failed");

    // Other tests share the table, so assert on this user's slice only.
    let ours: Vec<&ScrapbookEntry> =
        all_public.iter().filter(|e| e.user_id == user.id).collect();

    let ids: Vec<Uuid> = ours.iter().map(|e| e.id).collect();
    assert_eq!(
        ids,
        vec![newer_public.id, older_public.id],
        "Public listing must be most-recently-created first"
    );
    assert!(
        !all_public.iter().any(|e| e.id == private.id),
        "A private entry must never appear in the public listing"
    );
}

#[test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_delete_entry_reports_row_removal() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let user = create_test_user(&ctx.pool, "deleter").await;
    let entry = create_test_entry(&ctx.pool, user.id, "To delete", false, Utc::now()).await;

    let removed = repo.delete_entry(entry.id).await.expect("delete_entry failed");
    assert!(removed, "First delete should remove the row");

    let gone = repo.get_entry(entry.id).await.expect("get_entry failed");
    assert!(gone.is_none());

    // Deleting an id with no row reports false, not an error.
    let removed_again = repo.delete_entry(entry.id).await.expect("delete_entry failed");
    assert!(!removed_again);
}
