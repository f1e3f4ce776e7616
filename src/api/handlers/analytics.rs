//! Handler for per-link click analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::api::dto::analytics::AnalyticsResponse;
use crate::api::middleware::OwnerId;
use crate::error::AppError;
use crate::state::AppState;

/// Aggregated click analytics for one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/links/{id}/analytics`
///
/// Recomputed from the click history on every request.
///
/// # Response
///
/// ```json
/// {
///   "link_id": "…",
///   "total_clicks": 42,
///   "unique_clicks": 17,
///   "bot_clicks": 3,
///   "clicks_by_country": { "Germany": 20, "Unknown": 22 },
///   "clicks_by_device": { "Desktop": 30, "Mobile": 12 },
///   "clicks_by_day": { "2026-05-01": 40, "2026-05-02": 2 },
///   "top_referrers": [{ "domain": "t.co", "count": 12 }],
///   "recent_clicks": [ … ]
/// }
/// ```
///
/// # Errors
///
/// - **404 Not Found**: no link with this id
/// - **403 Forbidden**: link belongs to another owner
pub async fn analytics_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    state
        .link_service
        .get_owned_link(id, owner.as_str())
        .await?;

    let summary = state.analytics_service.get_analytics(id).await?;

    Ok(Json(summary.into()))
}
