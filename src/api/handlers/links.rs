//! Handlers for link management endpoints (create, list, get).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse};
use crate::api::middleware::OwnerId;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/landing",
///   "custom_alias": "promo24",          // optional, 3-32 letters/digits
///   "title": "Spring promo",            // optional
///   "description": "Newsletter link",   // optional
///   "expires_at": "2026-12-31T23:59:59Z", // optional
///   "lead_capture_enabled": true        // optional, default false
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: invalid URL, alias, or past expiry
/// - **409 Conflict**: custom alias already taken
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(owner.as_str(), &payload.url, payload.options())
        .await?;

    let short_url = state.link_service.short_url(&link);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_for_owner(owner.as_str()).await?;

    let items = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(items))
}

/// Returns one of the caller's links with its counters.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
///
/// # Errors
///
/// - **404 Not Found**: no link with this id
/// - **403 Forbidden**: link belongs to another owner
pub async fn get_link_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .link_service
        .get_owned_link(id, owner.as_str())
        .await?;

    let short_url = state.link_service.short_url(&link);

    Ok(Json(LinkResponse::new(link, short_url)))
}
