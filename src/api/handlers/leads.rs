//! Handlers for the lead capture gate and lead listings.

use axum::{
    Extension, Json,
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, header},
};
use serde_json::json;
use std::net::SocketAddr;
use uuid::Uuid;

use crate::api::dto::lead::{LeadResponse, OwnerLeadResponse, SubmitLeadRequest, SubmitLeadResponse};
use crate::api::dto::link::CaptureLinkResponse;
use crate::api::dto::pagination::{PagedResponse, PaginationParams};
use crate::api::handlers::redirect::header_string;
use crate::api::middleware::OwnerId;
use crate::application::services::LeadContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_address;

/// Public link details for rendering the capture page.
///
/// # Endpoint
///
/// `GET /api/capture/{code}`
///
/// No click is recorded.
///
/// # Errors
///
/// - **404 Not Found**: unknown or deactivated code
/// - **410 Gone**: link has expired
pub async fn capture_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CaptureLinkResponse>, AppError> {
    let link = state
        .link_service
        .get_by_short_code(&code)
        .await?
        .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))?;

    if link.is_expired() {
        return Err(AppError::expired(
            "Link has expired",
            json!({ "code": code, "expires_at": link.expires_at }),
        ));
    }

    Ok(Json(link.into()))
}

/// Submits a lead for a link.
///
/// # Endpoint
///
/// `POST /api/capture`
///
/// # Request Body
///
/// ```json
/// {
///   "short_code": "aZ3k9Q",        // or "link_id": "<uuid>"
///   "email": "Ada@Example.com",
///   "name": "Ada Lovelace",
///   "timestamp": "2026-05-01T10:00:00Z" // optional
/// }
/// ```
///
/// Re-submitting the same email for the same link answers 200 with
/// `"duplicate": true` and stores nothing.
///
/// # Errors
///
/// - **400 Bad Request**: missing target, malformed email, or short name
/// - **404 Not Found**: target link does not exist
pub async fn submit_lead_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<SubmitLeadRequest>,
) -> Result<Json<SubmitLeadResponse>, AppError> {
    let target = payload.target()?;

    let context = LeadContext {
        user_agent: header_string(&headers, header::USER_AGENT.as_str()),
        referrer: header_string(&headers, header::REFERER.as_str()),
        client_address: Some(client_address(&headers, addr, state.behind_proxy)),
        captured_at: payload.timestamp,
    };

    let outcome = state
        .lead_service
        .submit(target, &payload.email, &payload.name, context)
        .await?;

    Ok(Json(outcome.into()))
}

/// Lists leads captured for one of the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links/{id}/leads?page=1&page_size=50`
///
/// # Errors
///
/// - **400 Bad Request**: page < 1 or page_size outside 1-500
/// - **404 Not Found**: no link with this id
/// - **403 Forbidden**: link belongs to another owner
pub async fn link_leads_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PagedResponse<LeadResponse>>, AppError> {
    state
        .link_service
        .get_owned_link(id, owner.as_str())
        .await?;

    let page = state
        .lead_service
        .list_for_link(id, params.page, params.page_size)
        .await?;

    Ok(Json(PagedResponse::from_page(page, LeadResponse::from)))
}

/// Lists leads across all of the caller's links, joined with link details.
///
/// # Endpoint
///
/// `GET /api/leads?page=1&page_size=100`
pub async fn owner_leads_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PagedResponse<OwnerLeadResponse>>, AppError> {
    let page = state
        .lead_service
        .list_for_owner(owner.as_str(), params.page, params.page_size)
        .await?;

    Ok(Json(PagedResponse::from_page(page, OwnerLeadResponse::from)))
}
