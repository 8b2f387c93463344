//! SurrealDB repository implementations.

mod inspection;

pub use inspection::SurrealInspectionRepository;
