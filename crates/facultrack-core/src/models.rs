//! Domain models for Facultrack.
//!
//! These are the core types shared across all crates.

pub mod identity;
pub mod inspection;
