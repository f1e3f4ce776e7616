//! Business logic services for the application layer.

pub mod analytics_service;
pub mod click_recorder;
pub mod lead_service;
pub mod link_service;
pub mod redirect_service;

pub use analytics_service::AnalyticsService;
pub use click_recorder::ClickRecorder;
pub use lead_service::{LeadContext, LeadService, LeadTarget};
pub use link_service::{CreateLinkOptions, LinkService};
pub use redirect_service::{RedirectService, Resolution, VisitorContext};
