//! Handlers for short link resolution.

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::Redirect,
};
use std::net::SocketAddr;
use tracing::error;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::redirect::RedirectResponse;
use crate::application::services::VisitorContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_address;

pub const SESSION_HEADER: &str = "x-session-id";

/// Resolves a short code and returns the destination as JSON.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// The click is queued for background recording before the response is
/// returned; recording never delays or fails the request.
///
/// # Response
///
/// ```json
/// {
///   "destination_url": "https://example.com/landing",
///   "link": { "id": "…", "short_code": "aZ3k9Q", "lead_capture_enabled": true, … }
/// }
/// ```
///
/// # Errors
///
/// - **404 Not Found**: unknown or deactivated code
/// - **410 Gone**: link has expired
pub async fn redirect_json_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<RedirectResponse>, AppError> {
    let visitor = visitor_context(&headers, addr, state.behind_proxy);

    let resolution = state
        .redirect_service
        .resolve_and_track(&code, &visitor)
        .await?;

    let short_url = state.link_service.short_url(&resolution.link);

    Ok(Json(RedirectResponse {
        destination_url: resolution.destination_url,
        link: LinkResponse::new(resolution.link, short_url),
    }))
}

/// Resolves a short code and redirects the browser.
///
/// # Endpoint
///
/// `GET /r/{code}/direct`
///
/// Answers `307 Temporary Redirect` to the destination. Failures redirect
/// to the frontend with an `error` query parameter instead of rendering an
/// error body:
///
/// - `?error=not-found` for unknown or deactivated codes
/// - `?error=expired` for expired links
/// - `?error=server-error` for anything else
pub async fn redirect_direct_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Redirect {
    let visitor = visitor_context(&headers, addr, state.behind_proxy);

    match state
        .redirect_service
        .resolve_and_track(&code, &visitor)
        .await
    {
        Ok(resolution) => Redirect::temporary(&resolution.destination_url),
        Err(e) => {
            let reason = match e {
                AppError::NotFound { .. } => "not-found",
                AppError::Expired { .. } => "expired",
                _ => {
                    error!(code = %code, error = %e, "Redirect failed");
                    "server-error"
                }
            };
            Redirect::temporary(&format!("{}?error={}", state.frontend_url, reason))
        }
    }
}

fn visitor_context(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> VisitorContext {
    VisitorContext {
        client_address: client_address(headers, peer, behind_proxy),
        user_agent: header_string(headers, header::USER_AGENT.as_str()),
        referrer: header_string(headers, header::REFERER.as_str()),
        session_id: header_string(headers, SESSION_HEADER),
    }
}

/// Non-empty UTF-8 header value.
pub(crate) fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
