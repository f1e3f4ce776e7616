//! Repository trait for link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for the link registry.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - process-local store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link with zeroed counters and `is_active = true`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTaken`] if the short code already exists.
    /// Returns [`AppError::Storage`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError>;

    /// Finds a link by short code regardless of its active flag or expiry.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists an owner's links, newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError>;

    /// Atomically adds one to `total_clicks` and, if `unique`, to
    /// `unique_clicks`. Also bumps `updated_at`.
    async fn increment_counters(&self, id: Uuid, unique: bool) -> Result<(), AppError>;

    /// Atomically adds one to `lead_captures` and bumps `updated_at`.
    async fn increment_lead_count(&self, id: Uuid) -> Result<(), AppError>;

    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
