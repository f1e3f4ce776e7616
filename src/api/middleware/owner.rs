//! Owner identity middleware.
//!
//! The identity provider (or the gateway in front of this service) sets the
//! `X-User-Id` header. This layer only requires it; it performs no
//! authentication of its own.

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use serde_json::json;

use crate::error::AppError;

pub const OWNER_HEADER: &str = "x-user-id";

/// Opaque owner identifier attached to the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Requires an owner identity on every request it wraps.
///
/// Handlers read it with `Extension<OwnerId>`.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing, blank, or not valid
/// UTF-8.
///
/// # Example
///
/// ```rust,ignore
/// let owned = Router::new()
///     .route("/links", get(list_links_handler))
///     .route_layer(middleware::from_fn(owner::layer));
/// ```
pub async fn layer(mut req: Request, next: Next) -> Result<Response, AppError> {
    let owner = owner_from_headers(req.headers())?;
    req.extensions_mut().insert(owner);

    Ok(next.run(req).await)
}

fn owner_from_headers(headers: &HeaderMap) -> Result<OwnerId, AppError> {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| OwnerId(v.to_string()))
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "X-User-Id header is missing or invalid" }),
            )
        })
}
