//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "inspection_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — inspection records
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Inspections (owned by a staff member, reviewed by department chain)
-- =======================================================================
DEFINE TABLE inspection SCHEMAFULL;
DEFINE FIELD owner_id ON TABLE inspection TYPE string;
DEFINE FIELD department ON TABLE inspection TYPE string;
DEFINE FIELD date ON TABLE inspection TYPE string;
DEFINE FIELD findings ON TABLE inspection TYPE string;
DEFINE FIELD corrective_action ON TABLE inspection TYPE string;
DEFINE FIELD remarks ON TABLE inspection TYPE string;
DEFINE FIELD hod_signature_url ON TABLE inspection TYPE option<string>;
DEFINE FIELD dean_signature_url ON TABLE inspection TYPE option<string>;
DEFINE FIELD status ON TABLE inspection TYPE string \
    ASSERT $value IN ['Pending', 'Submitted', 'HOD Approved', \
    'Dean Approved', 'Returned'];
DEFINE FIELD reviewer_note ON TABLE inspection TYPE option<string>;
DEFINE FIELD version ON TABLE inspection TYPE int ASSERT $value >= 1;
DEFINE FIELD created_at ON TABLE inspection TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE inspection TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_inspection_owner ON TABLE inspection COLUMNS owner_id;
DEFINE INDEX idx_inspection_department_status ON TABLE inspection \
    COLUMNS department, status;
";

/// Run all pending schema migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(version = migration.version, "Migration applied");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_defines_inspection_table() {
        assert!(SCHEMA_V1.contains("DEFINE TABLE inspection SCHEMAFULL"));
    }

    #[test]
    fn schema_status_assert_lists_every_status() {
        for status in facultrack_core::models::inspection::InspectionStatus::ALL {
            assert!(
                SCHEMA_V1.contains(&format!("'{status}'")),
                "status '{status}' missing from ASSERT"
            );
        }
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
