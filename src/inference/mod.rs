//! Serving module
//!
//! Provides read-only rent estimation from a persisted pipeline:
//! - `RentService` wrapping an `Arc`-shared pipeline with its metadata
//! - A lazily loaded process-wide instance
//! - The input domains of the interactive estimate form

mod form;
mod service;

pub use form::{
    PropertyForm, BATHROOM_RANGE, BHK_RANGE, CITIES, CONTACT_TYPES, DEFAULT_FLOOR,
    FURNISHING_STATUSES, SIZE_RANGE,
};
pub use service::{Estimate, RentService};
