//! Database-specific error types and conversions.

use facultrack_core::error::FacultrackError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for FacultrackError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FacultrackError::NotFound { entity, id },
            other => FacultrackError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_failure_is_not_reported_as_migration() {
        let err = DbError::Query("Found 'Closed' for field `status`".into());
        assert!(err.to_string().starts_with("Query failed"));

        let domain: FacultrackError = err.into();
        assert!(matches!(domain, FacultrackError::Database(msg) if msg.starts_with("Query failed")));
    }

    #[test]
    fn not_found_keeps_entity_and_id() {
        let err = DbError::NotFound {
            entity: "inspection".into(),
            id: "abc".into(),
        };
        let domain: FacultrackError = err.into();
        assert!(matches!(
            domain,
            FacultrackError::NotFound { ref entity, ref id } if entity == "inspection" && id == "abc"
        ));
    }
}
