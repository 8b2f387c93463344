//! Facultrack Core — domain models, error types, repository traits and
//! the inspection status workflow shared by every other crate.

pub mod error;
pub mod models;
pub mod repository;
pub mod workflow;
