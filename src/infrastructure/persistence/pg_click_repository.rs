//! PostgreSQL implementation of the click log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Click, ClickStamp, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct ClickRow {
    id: i64,
    short_url_id: i64,
    created_at: DateTime<Utc>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

/// Append-only writer and reader for the `clicks` table.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (short_url_id, ip_address, user_agent)
            VALUES ($1, $2, $3)
            RETURNING id, short_url_id, created_at, ip_address, user_agent
            "#,
        )
        .bind(new_click.short_link_id)
        .bind(new_click.ip_address)
        .bind(new_click.user_agent)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Click {
            id: row.id,
            short_link_id: row.short_url_id,
            created_at: row.created_at,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
        })
    }

    async fn stamps_for_links(&self, link_ids: &[i64]) -> Result<Vec<ClickStamp>, AppError> {
        let rows = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            r#"
            SELECT short_url_id, created_at
            FROM clicks
            WHERE short_url_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(link_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(short_link_id, created_at)| ClickStamp {
                short_link_id,
                created_at,
            })
            .collect())
    }

    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clicks WHERE short_url_id = $1")
                .bind(link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
