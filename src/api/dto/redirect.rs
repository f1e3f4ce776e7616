//! DTOs for the JSON redirect endpoint.

use serde::Serialize;

use crate::api::dto::link::LinkResponse;

/// Resolved destination plus the link it came from.
#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub destination_url: String,
    pub link: LinkResponse,
}
