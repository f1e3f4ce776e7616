//! HTTP middleware for request processing and protection.
//!
//! Provides owner identity extraction, rate limiting, and observability
//! middleware.

pub mod owner;
pub mod rate_limit;
pub mod tracing;

pub use owner::OwnerId;
