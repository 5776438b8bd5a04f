//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{LinkStatus, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, original_url, code, shortened_url, click_count, expired_at, \
     created_at, updated_at, deleted_at, user_id";

#[derive(FromRow)]
struct ShortUrlRow {
    id: i64,
    original_url: String,
    code: String,
    shortened_url: String,
    click_count: i64,
    expired_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    user_id: Option<i64>,
}

impl From<ShortUrlRow> for ShortLink {
    fn from(row: ShortUrlRow) -> Self {
        ShortLink {
            id: row.id,
            original_url: row.original_url,
            code: row.code,
            shortened_url: row.shortened_url,
            click_count: row.click_count,
            expired_at: row.expired_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            status: LinkStatus::from_deleted_at(row.deleted_at),
            owner_user_id: row.user_id,
        }
    }
}

/// PostgreSQL repository for the `short_urls` table.
///
/// Every read filters on `deleted_at IS NULL`. The click counter is bumped
/// with a single `UPDATE ... SET click_count = click_count + 1`.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            r#"
            INSERT INTO short_urls (original_url, code, shortened_url, expired_at, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(new_link.original_url)
        .bind(new_link.code)
        .bind(new_link.shortened_url)
        .bind(new_link.expired_at)
        .bind(new_link.owner_user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM short_urls WHERE code = $1 AND deleted_at IS NULL"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM short_urls WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_active_by_owner(&self, owner_user_id: i64) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, ShortUrlRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM short_urls
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(owner_user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE short_urls
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_click_count(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE short_urls
            SET click_count = click_count + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn click_count(&self, id: i64) -> Result<Option<i64>, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT click_count FROM short_urls WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn set_click_count(&self, id: i64, click_count: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE short_urls SET click_count = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(click_count)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM short_urls WHERE deleted_at IS NULL",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
