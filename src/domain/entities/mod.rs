//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live next to them as
//! `New*` structs; the repository assigns ids and storage-derived fields.
//!
//! - [`Link`] - a short code mapped to a destination URL, with counters
//! - [`Click`] - one enriched redirect event
//! - [`LeadCapture`] - contact details submitted through the lead gate
//! - [`Page`] - a page of listing results

pub mod click;
pub mod lead_capture;
pub mod link;
pub mod page;

pub use click::{Click, NewClick, local_day_window, same_local_day};
pub use lead_capture::{
    LeadCapture, LeadInsert, LeadOutcome, NewLeadCapture, OwnerLeadCapture,
};
pub use link::{Link, NewLink};
pub use page::{Page, PageRequest};

#[cfg(test)]
pub(crate) use link::sample_link;
