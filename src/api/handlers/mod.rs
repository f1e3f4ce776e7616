//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod health;
pub mod leads;
pub mod links;
pub mod redirect;

pub use analytics::analytics_handler;
pub use health::health_handler;
pub use leads::{capture_link_handler, link_leads_handler, owner_leads_handler, submit_lead_handler};
pub use links::{create_link_handler, get_link_handler, list_links_handler};
pub use redirect::{redirect_direct_handler, redirect_json_handler};
