//! Repository implementations.
//!
//! PostgreSQL repositories use runtime-checked SQLx queries against the
//! schema in `migrations/`. [`InMemoryStore`] implements every trait for
//! local development and tests.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link registry and counters
//! - [`PgClickRepository`] - Click history with per-day uniqueness
//! - [`PgLeadRepository`] - Lead captures
//! - [`InMemoryStore`] - All of the above, process-local

pub mod memory;
pub mod pg_click_repository;
pub mod pg_lead_repository;
pub mod pg_link_repository;
mod rows;

pub use memory::InMemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_lead_repository::PgLeadRepository;
pub use pg_link_repository::PgLinkRepository;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{ClickRepository, LeadRepository, LinkRepository};

/// The three repositories the services are wired with.
#[derive(Clone)]
pub struct Storage {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub leads: Arc<dyn LeadRepository>,
}

impl Storage {
    pub fn postgres(pool: PgPool) -> Self {
        let pool = Arc::new(pool);
        Self {
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool.clone())),
            leads: Arc::new(PgLeadRepository::new(pool)),
        }
    }

    /// One shared [`InMemoryStore`] behind all three traits.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            links: store.clone(),
            clicks: store.clone(),
            leads: store,
        }
    }
}
