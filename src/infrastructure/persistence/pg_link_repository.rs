//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::{LINKS_SHORT_CODE_KEY, is_unique_violation_on};

const LINK_COLUMNS: &str = "id, owner_id, short_code, destination_url, custom_alias, title, \
     description, is_active, expires_at, lead_capture_enabled, total_clicks, unique_clicks, \
     lead_captures, created_at, updated_at";

/// PostgreSQL repository for the link registry.
///
/// Counter updates are single `UPDATE ... SET col = col + 1` statements, so
/// concurrent recorders never lose an increment.
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
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (
                id, owner_id, short_code, destination_url, custom_alias,
                title, description, expires_at, lead_capture_enabled
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {LINK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Link>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_link.owner_id)
            .bind(&new_link.short_code)
            .bind(&new_link.destination_url)
            .bind(&new_link.custom_alias)
            .bind(&new_link.title)
            .bind(&new_link.description)
            .bind(new_link.expires_at)
            .bind(new_link.lead_capture_enabled)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on(&e, LINKS_SHORT_CODE_KEY) {
                    AppError::alias_taken(
                        "Short code is already taken",
                        json!({ "short_code": new_link.short_code }),
                    )
                } else {
                    e.into()
                }
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");

        Ok(sqlx::query_as::<_, Link>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1");

        Ok(sqlx::query_as::<_, Link>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE owner_id = $1 ORDER BY created_at DESC, id"
        );

        Ok(sqlx::query_as::<_, Link>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?)
    }

    async fn increment_counters(&self, id: Uuid, unique: bool) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE links
            SET total_clicks = total_clicks + 1,
                unique_clicks = unique_clicks + CASE WHEN $2 THEN 1 ELSE 0 END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(unique)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn increment_lead_count(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE links
            SET lead_captures = lead_captures + 1,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
