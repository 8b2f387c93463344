//! Facultrack Database — SurrealDB connection management, schema
//! migrations and the inspection repository.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - [`InspectionRepository`](facultrack_core::repository::InspectionRepository)
//!   implementation ([`repository::SurrealInspectionRepository`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
