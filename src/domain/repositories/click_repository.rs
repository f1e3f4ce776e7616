//! Repository trait for click storage.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Persists a click and decides its uniqueness in one atomic step.
    ///
    /// The click is unique when no earlier click exists for the same
    /// `(link_id, client_address)` inside the server-local calendar day of
    /// `clicked_at`. Concurrent calls for the same pair are serialized so
    /// exactly one of them is unique.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors; nothing is written.
    async fn record(&self, click: NewClick) -> Result<Click, AppError>;

    /// Full click history for a link in ascending timestamp order.
    async fn list_for_link(&self, link_id: Uuid) -> Result<Vec<Click>, AppError>;
}
