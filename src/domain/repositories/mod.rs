//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! - [`LinkRepository`] - link registry and rolling counters
//! - [`ClickRepository`] - click history with per-day uniqueness
//! - [`LeadRepository`] - lead captures
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod click_repository;
pub mod lead_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use lead_repository::LeadRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
