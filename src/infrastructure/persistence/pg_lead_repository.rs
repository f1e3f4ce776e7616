//! PostgreSQL implementation of lead repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{
    LeadCapture, LeadInsert, NewLeadCapture, OwnerLeadCapture, PageRequest,
};
use crate::domain::repositories::LeadRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::rows::{LEAD_COLUMNS, LeadRow, OwnerLeadRow};
use crate::utils::db_error::{LEAD_CAPTURES_LINK_EMAIL_KEY, is_unique_violation_on};

/// PostgreSQL repository for lead captures.
///
/// The `(link_id, email)` unique constraint is the final arbiter for
/// concurrent duplicate submissions.
pub struct PgLeadRepository {
    pool: Arc<PgPool>,
}

impl PgLeadRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for PgLeadRepository {
    async fn find_by_link_and_email(
        &self,
        link_id: Uuid,
        email: &str,
    ) -> Result<Option<LeadCapture>, AppError> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM lead_captures WHERE link_id = $1 AND email = $2");

        let row = sqlx::query_as::<_, LeadRow>(&sql)
            .bind(link_id)
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(LeadCapture::from))
    }

    async fn insert(&self, capture: NewLeadCapture) -> Result<LeadInsert, AppError> {
        let id = Uuid::new_v4();

        let result = sqlx::query(
            r#"
            INSERT INTO lead_captures (
                id, link_id, email, name, user_agent, referrer, client_address,
                country, region, city, latitude, longitude, timezone,
                device_type, browser, os, is_mobile, is_bot, captured_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(id)
        .bind(capture.link_id)
        .bind(&capture.email)
        .bind(&capture.name)
        .bind(&capture.user_agent)
        .bind(&capture.referrer)
        .bind(&capture.client_address)
        .bind(&capture.geo.country)
        .bind(&capture.geo.region)
        .bind(&capture.geo.city)
        .bind(capture.geo.latitude)
        .bind(capture.geo.longitude)
        .bind(&capture.geo.timezone)
        .bind(capture.client.device.as_str())
        .bind(capture.client.browser.as_str())
        .bind(capture.client.os.as_str())
        .bind(capture.client.is_mobile)
        .bind(capture.client.is_bot)
        .bind(capture.captured_at)
        .execute(self.pool.as_ref())
        .await;

        match result {
            Ok(_) => Ok(LeadInsert::Created(capture.into_capture(id))),
            Err(e) if is_unique_violation_on(&e, LEAD_CAPTURES_LINK_EMAIL_KEY) => {
                Ok(LeadInsert::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_by_link(
        &self,
        link_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<LeadCapture>, AppError> {
        let sql = format!(
            r#"
            SELECT {LEAD_COLUMNS} FROM lead_captures
            WHERE link_id = $1
            ORDER BY captured_at DESC, id
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, LeadRow>(&sql)
            .bind(link_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(LeadCapture::from).collect())
    }

    async fn count_by_link(&self, link_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lead_captures WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Vec<OwnerLeadCapture>, AppError> {
        let rows = sqlx::query_as::<_, OwnerLeadRow>(
            r#"
            SELECT
                lc.id, lc.link_id, lc.email, lc.name, lc.user_agent, lc.referrer,
                lc.client_address, lc.country, lc.region, lc.city, lc.latitude,
                lc.longitude, lc.timezone, lc.device_type, lc.browser, lc.os,
                lc.is_mobile, lc.is_bot, lc.captured_at,
                l.title AS link_title, l.short_code, l.destination_url
            FROM lead_captures lc
            JOIN links l ON l.id = lc.link_id
            WHERE l.owner_id = $1
            ORDER BY lc.captured_at DESC, lc.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(OwnerLeadCapture::from).collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM lead_captures lc
            JOIN links l ON l.id = lc.link_id
            WHERE l.owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
