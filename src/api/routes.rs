//! API route configuration.
//!
//! Public routes serve visitors (resolution and lead capture). Owner routes
//! require the `X-User-Id` header via [`crate::api::middleware::owner`].

use crate::api::handlers::{
    analytics_handler, capture_link_handler, create_link_handler, get_link_handler,
    link_leads_handler, list_links_handler, owner_leads_handler, redirect_direct_handler,
    redirect_json_handler, submit_lead_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short link resolution, nested under `/r`.
///
/// - `GET /{code}`        - Resolve as JSON and track the click
/// - `GET /{code}/direct` - Resolve with a 307 redirect and track the click
pub fn redirect_routes() -> Router<AppState> {
    Router::new()
        .route("/{code}", get(redirect_json_handler))
        .route("/{code}/direct", get(redirect_direct_handler))
}

/// Lead capture gate, nested under `/api`. No owner identity required.
///
/// - `GET  /capture/{code}` - Link details for the capture page
/// - `POST /capture`        - Submit a lead
pub fn capture_routes() -> Router<AppState> {
    Router::new()
        .route("/capture", post(submit_lead_handler))
        .route("/capture/{code}", get(capture_link_handler))
}

/// Owner routes, nested under `/api`.
///
/// - `GET  /links`                - List the caller's links
/// - `POST /links`                - Create a link
/// - `GET  /links/{id}`           - Link details with counters
/// - `GET  /links/{id}/analytics` - Click analytics
/// - `GET  /links/{id}/leads`     - Leads for one link (paginated)
/// - `GET  /leads`                - Leads across all links (paginated)
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{id}", get(get_link_handler))
        .route("/links/{id}/analytics", get(analytics_handler))
        .route("/links/{id}/leads", get(link_leads_handler))
        .route("/leads", get(owner_leads_handler))
}
