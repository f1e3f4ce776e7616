//! Repository trait for lead capture storage.

use crate::domain::entities::{
    LeadCapture, LeadInsert, NewLeadCapture, OwnerLeadCapture, PageRequest,
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Looks up a capture by link and normalized email.
    async fn find_by_link_and_email(
        &self,
        link_id: Uuid,
        email: &str,
    ) -> Result<Option<LeadCapture>, AppError>;

    /// Inserts a capture.
    ///
    /// Returns [`LeadInsert::Duplicate`] instead of an error when the
    /// `(link_id, email)` pair already exists, including when a concurrent
    /// submission won the race.
    async fn insert(&self, capture: NewLeadCapture) -> Result<LeadInsert, AppError>;

    /// Captures for a link, newest first.
    async fn list_by_link(
        &self,
        link_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<LeadCapture>, AppError>;

    async fn count_by_link(&self, link_id: Uuid) -> Result<i64, AppError>;

    /// Captures across all of an owner's links, newest first, joined with
    /// link title, short code, and destination.
    async fn list_by_owner(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Vec<OwnerLeadCapture>, AppError>;

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError>;
}
