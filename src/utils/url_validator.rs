//! Destination URL validation.

use crate::error::AppError;
use serde_json::json;
use url::Url;

/// Validates that `raw` is an absolute `http` or `https` URL with a host.
///
/// Plain ASCII input is returned trimmed and otherwise unchanged. Input with
/// non-ASCII or whitespace characters is returned in the parser's serialized
/// form (punycode host, percent-encoded path) so it is safe for a `Location`
/// header.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for relative URLs, other schemes, or
/// anything the URL parser rejects.
pub fn validate_destination_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();

    let parsed = Url::parse(trimmed).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "field": "destination_url", "reason": e.to_string() }),
        )
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::bad_request(
            "Invalid URL format",
            json!({ "field": "destination_url", "reason": "URL scheme must be http or https" }),
        ));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(AppError::bad_request(
            "Invalid URL format",
            json!({ "field": "destination_url", "reason": "URL must have a host" }),
        ));
    }

    if trimmed.bytes().all(|b| b.is_ascii_graphic()) {
        Ok(trimmed.to_string())
    } else {
        Ok(parsed.to_string())
    }
}
