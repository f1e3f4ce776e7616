//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_validator`] - Destination URL validation
//! - [`client_ip`] - Client address extraction
//! - [`referrer`] - Referrer domain extraction for analytics
//! - [`db_error`] - Classification of PostgreSQL errors

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod referrer;
pub mod url_validator;
