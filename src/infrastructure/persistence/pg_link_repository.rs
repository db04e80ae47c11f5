//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Uniqueness is enforced by the `short_links_short_code_key` constraint, so an
/// insert is a single atomic statement; a violation surfaces as
/// [`AppError::CodeConflict`]. Statements run in autocommit mode and are durable
/// once they return.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Counts all stored links.
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }
}

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    short_code: String,
    original_url: String,
    owner_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(r: ShortLinkRow) -> Self {
        ShortLink::new(r.id, r.short_code, r.original_url, r.owner_id, r.created_at)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO short_links (short_code, original_url, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, short_code, original_url, owner_id, created_at
            "#,
        )
        .bind(&new_link.short_code)
        .bind(&new_link.original_url)
        .bind(&new_link.owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn get_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, short_code, original_url, owner_id, created_at
            FROM short_links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, short_code, original_url, owner_id, created_at
            FROM short_links
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ShortLink::from).collect())
    }

    async fn delete(
        &self,
        short_code: &str,
        requesting_owner_id: Option<String>,
    ) -> Result<(), AppError> {
        // Lock the row, then delete it only if the requester owns it. One
        // statement, so "missing" and "not yours" are decided atomically.
        let (found, deleted): (bool, bool) = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id, owner_id
                FROM short_links
                WHERE short_code = $1
                FOR UPDATE
            ),
            removed AS (
                DELETE FROM short_links s
                USING target t
                WHERE s.id = t.id
                  AND t.owner_id IS NOT DISTINCT FROM $2
                RETURNING s.id
            )
            SELECT
                EXISTS (SELECT 1 FROM target)  AS found,
                EXISTS (SELECT 1 FROM removed) AS deleted
            "#,
        )
        .bind(short_code)
        .bind(&requesting_owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        match (found, deleted) {
            (_, true) => Ok(()),
            (false, false) => Err(AppError::not_found(
                "Short link not found",
                json!({ "code": short_code }),
            )),
            (true, false) => Err(AppError::forbidden(
                "Only the owner can delete this short link",
                json!({ "code": short_code }),
            )),
        }
    }

    async fn next_sequence(&self) -> Result<u64, AppError> {
        let value: i64 = sqlx::query_scalar("SELECT nextval('short_code_seq')")
            .fetch_one(self.pool.as_ref())
            .await?;

        u64::try_from(value).map_err(|_| {
            AppError::internal("Code sequence returned a negative value", json!({ "value": value }))
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
