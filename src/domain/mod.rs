//! Domain layer containing business entities and pure logic.
//!
//! Nothing here depends on the HTTP layer or a concrete store.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`enrichment`] - User-agent classification and the geo lookup contract
//! - [`analytics`] - Scan-and-group aggregation over click history
//! - [`click_event`] - Message handed from the redirect path to the recorder
//!
//! # Click Processing Flow
//!
//! 1. The redirect path resolves a link and decides the destination
//! 2. A [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`crate::application::click_worker::run_click_worker`] hands it to the
//!    [`crate::application::services::ClickRecorder`]
//! 4. The recorder enriches, persists, and bumps the link counters

pub mod analytics;
pub mod click_event;
pub mod enrichment;
pub mod entities;
pub mod repositories;
