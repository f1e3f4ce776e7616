//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check: storage and click queue (public)
//! - `/r/*`           - Short link resolution (public, rate limited)
//! - `/api/capture*`  - Lead capture gate (public, rate limited)
//! - `/api/*`         - Owner API (`X-User-Id` required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on public routes
//! - **Owner identity** - `X-User-Id` header on owner routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{owner, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// When `state.behind_proxy` is set, rate limiting keys on the forwarded
/// client address instead of the peer socket address.
///
/// The router expects `ConnectInfo<SocketAddr>`; serve it with
/// `into_make_service_with_connect_info`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let behind_proxy = state.behind_proxy;

    let api_router = Router::new()
        .merge(limited(api::routes::capture_routes(), behind_proxy))
        .merge(api::routes::owner_routes().route_layer(middleware::from_fn(owner::layer)));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/r", limited(api::routes::redirect_routes(), behind_proxy))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn limited(router: Router<AppState>, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(rate_limit::proxied_layer())
    } else {
        router.layer(rate_limit::layer())
    }
}
