//! Facultrack Review — owner and reviewer operations on inspection
//! records, composed from the workflow, the authorization gate and the
//! record store.

pub mod service;

pub use service::{InspectionDraft, InspectionService, ReviewListing};
