//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation, and enrichment. They
//! consume repository traits and give HTTP handlers a narrow API.
//!
//! # Available Services
//!
//! - [`services::LinkService`] - Short link creation and lookup
//! - [`services::RedirectService`] - Resolve-and-track on the redirect path
//! - [`services::ClickRecorder`] - Enrich and persist one click
//! - [`services::LeadService`] - Lead capture gate and listings
//! - [`services::AnalyticsService`] - Per-link click aggregation
//!
//! The [`click_worker`] drains the click queue in the background.

pub mod click_worker;
pub mod services;
