//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Click, NewClick, local_day_window};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::rows::{CLICK_COLUMNS, ClickRow};

/// PostgreSQL repository for click history.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, click: NewClick) -> Result<Click, AppError> {
        let mut tx = self.pool.begin().await?;

        // Serializes recorders for the same (link, address) until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("{}|{}", click.link_id, click.client_address))
            .execute(&mut *tx)
            .await?;

        let (day_start, day_end) = local_day_window(click.clicked_at);
        let seen_today: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM clicks
                WHERE link_id = $1
                  AND client_address = $2
                  AND clicked_at >= $3
                  AND clicked_at < $4
            )
            "#,
        )
        .bind(click.link_id)
        .bind(&click.client_address)
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&mut *tx)
        .await?;

        let id = Uuid::new_v4();
        let is_unique = !seen_today;

        sqlx::query(
            r#"
            INSERT INTO clicks (
                id, link_id, client_address, user_agent, referrer,
                country, region, city, latitude, longitude, timezone,
                device_type, browser, os, is_mobile, is_bot,
                session_id, is_unique, clicked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(id)
        .bind(click.link_id)
        .bind(&click.client_address)
        .bind(&click.user_agent)
        .bind(&click.referrer)
        .bind(&click.geo.country)
        .bind(&click.geo.region)
        .bind(&click.geo.city)
        .bind(click.geo.latitude)
        .bind(click.geo.longitude)
        .bind(&click.geo.timezone)
        .bind(click.client.device.as_str())
        .bind(click.client.browser.as_str())
        .bind(click.client.os.as_str())
        .bind(click.client.is_mobile)
        .bind(click.client.is_bot)
        .bind(&click.session_id)
        .bind(is_unique)
        .bind(click.clicked_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(click.into_click(id, is_unique))
    }

    async fn list_for_link(&self, link_id: Uuid) -> Result<Vec<Click>, AppError> {
        let sql = format!(
            "SELECT {CLICK_COLUMNS} FROM clicks WHERE link_id = $1 ORDER BY clicked_at ASC, id"
        );

        let rows = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(link_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }
}
