//! SurrealDB implementation of [`InspectionRepository`].
//!
//! Every write is a single conditional statement guarded by
//! `WHERE version = $expected_version`. When it matches nothing the
//! record is re-read to tell a missing record from a stale version.

use chrono::{DateTime, NaiveDate, Utc};
use facultrack_core::error::{FacultrackError, FacultrackResult};
use facultrack_core::models::inspection::{
    CreateInspection, Inspection, InspectionStatus, StatusChange, UpdateInspection,
};
use facultrack_core::repository::{
    InspectionFilter, InspectionRepository, PaginatedResult, Pagination,
};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::DbError;

const ENTITY: &str = "inspection";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct InspectionRow {
    owner_id: String,
    department: String,
    date: String,
    findings: String,
    corrective_action: String,
    remarks: String,
    hod_signature_url: Option<String>,
    dean_signature_url: Option<String>,
    status: String,
    reviewer_note: Option<String>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct InspectionRowWithId {
    record_id: String,
    owner_id: String,
    department: String,
    date: String,
    findings: String,
    corrective_action: String,
    remarks: String,
    hod_signature_url: Option<String>,
    dean_signature_url: Option<String>,
    status: String,
    reviewer_note: Option<String>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

fn parse_status(s: &str) -> Result<InspectionStatus, DbError> {
    s.parse()
        .map_err(|_| DbError::Corrupt(format!("unknown inspection status: {s}")))
}

impl InspectionRow {
    fn into_inspection(self, id: Uuid) -> Result<Inspection, DbError> {
        let date = self
            .date
            .parse::<NaiveDate>()
            .map_err(|e| DbError::Corrupt(format!("invalid inspection date: {e}")))?;
        Ok(Inspection {
            id,
            owner_id: parse_uuid(&self.owner_id, "owner")?,
            department: self.department,
            date,
            findings: self.findings,
            corrective_action: self.corrective_action,
            remarks: self.remarks,
            hod_signature_url: self.hod_signature_url,
            dean_signature_url: self.dean_signature_url,
            status: parse_status(&self.status)?,
            reviewer_note: self.reviewer_note,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl InspectionRowWithId {
    fn try_into_inspection(self) -> Result<Inspection, DbError> {
        let id = parse_uuid(&self.record_id, "record")?;
        InspectionRow {
            owner_id: self.owner_id,
            department: self.department,
            date: self.date,
            findings: self.findings,
            corrective_action: self.corrective_action,
            remarks: self.remarks,
            hod_signature_url: self.hod_signature_url,
            dean_signature_url: self.dean_signature_url,
            status: self.status,
            reviewer_note: self.reviewer_note,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_inspection(id)
    }
}

/// SurrealDB implementation of the Inspection repository.
#[derive(Clone)]
pub struct SurrealInspectionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealInspectionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Explain why a versioned write matched no row.
    async fn write_miss(&self, id: Uuid, expected_version: u64) -> FacultrackError {
        match self.get_by_id(id).await {
            Ok(current) => {
                warn!(
                    inspection_id = %id,
                    expected_version,
                    actual_version = current.version,
                    "Stale inspection write rejected"
                );
                FacultrackError::Conflict {
                    entity: ENTITY.into(),
                    id: id.to_string(),
                    expected: expected_version,
                    actual: current.version,
                }
            }
            Err(err) => err,
        }
    }

    fn first_row(rows: Vec<InspectionRow>, id: Uuid) -> Option<Result<Inspection, DbError>> {
        rows.into_iter().next().map(|row| row.into_inspection(id))
    }
}

impl<C: Connection> InspectionRepository for SurrealInspectionRepository<C> {
    async fn create(&self, input: CreateInspection) -> FacultrackResult<Inspection> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('inspection', $id) SET \
                 owner_id = $owner_id, department = $department, \
                 date = $date, findings = $findings, \
                 corrective_action = $corrective_action, remarks = $remarks, \
                 hod_signature_url = $hod_signature_url, \
                 dean_signature_url = $dean_signature_url, \
                 status = $status, reviewer_note = NONE, version = 1",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("department", input.department))
            .bind(("date", input.date.to_string()))
            .bind(("findings", input.findings))
            .bind(("corrective_action", input.corrective_action))
            .bind(("remarks", input.remarks))
            .bind(("hod_signature_url", input.hod_signature_url))
            .bind(("dean_signature_url", input.dean_signature_url))
            .bind(("status", InspectionStatus::Pending.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        let inspection = Self::first_row(rows, id).ok_or_else(|| DbError::NotFound {
            entity: ENTITY.into(),
            id: id_str,
        })??;

        debug!(inspection_id = %id, owner_id = %inspection.owner_id, "Inspection created");
        Ok(inspection)
    }

    async fn get_by_id(&self, id: Uuid) -> FacultrackResult<Inspection> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('inspection', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: ENTITY.into(),
            id: id_str,
        })?;

        Ok(row.into_inspection(id)?)
    }

    async fn update_content(
        &self,
        id: Uuid,
        expected_version: u64,
        input: UpdateInspection,
        status: InspectionStatus,
    ) -> FacultrackResult<Inspection> {
        let mut sets = vec!["status = $status"];
        if input.date.is_some() {
            sets.push("date = $date");
        }
        if input.findings.is_some() {
            sets.push("findings = $findings");
        }
        if input.corrective_action.is_some() {
            sets.push("corrective_action = $corrective_action");
        }
        if input.remarks.is_some() {
            sets.push("remarks = $remarks");
        }
        if input.hod_signature_url.is_some() {
            sets.push("hod_signature_url = $hod_signature_url");
        }
        if input.dean_signature_url.is_some() {
            sets.push("dean_signature_url = $dean_signature_url");
        }
        sets.push("version += 1");
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('inspection', $id) SET {} \
             WHERE version = $expected_version",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("expected_version", expected_version))
            .bind(("status", status.as_str().to_string()));

        if let Some(date) = input.date {
            builder = builder.bind(("date", date.to_string()));
        }
        if let Some(findings) = input.findings {
            builder = builder.bind(("findings", findings));
        }
        if let Some(corrective_action) = input.corrective_action {
            builder = builder.bind(("corrective_action", corrective_action));
        }
        if let Some(remarks) = input.remarks {
            builder = builder.bind(("remarks", remarks));
        }
        if let Some(url) = input.hod_signature_url {
            // Some(None) clears the stored URL.
            builder = builder.bind(("hod_signature_url", url));
        }
        if let Some(url) = input.dean_signature_url {
            builder = builder.bind(("dean_signature_url", url));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        match Self::first_row(rows, id) {
            Some(inspection) => Ok(inspection?),
            None => Err(self.write_miss(id, expected_version).await),
        }
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected_version: u64,
        change: StatusChange,
    ) -> FacultrackResult<Inspection> {
        let mut sets = vec!["status = $status"];
        if change.reviewer_note.is_some() {
            sets.push("reviewer_note = $reviewer_note");
        }
        sets.push("version += 1");
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('inspection', $id) SET {} \
             WHERE version = $expected_version",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("expected_version", expected_version))
            .bind(("status", change.status.as_str().to_string()));
        if let Some(note) = change.reviewer_note {
            builder = builder.bind(("reviewer_note", note));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        match Self::first_row(rows, id) {
            Some(inspection) => Ok(inspection?),
            None => Err(self.write_miss(id, expected_version).await),
        }
    }

    async fn delete(&self, id: Uuid, expected_version: u64) -> FacultrackResult<()> {
        let result = self
            .db
            .query(
                "DELETE type::record('inspection', $id) \
                 WHERE version = $expected_version RETURN BEFORE",
            )
            .bind(("id", id.to_string()))
            .bind(("expected_version", expected_version))
            .await
            .map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<InspectionRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(self.write_miss(id, expected_version).await);
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: InspectionFilter,
        pagination: Pagination,
    ) -> FacultrackResult<PaginatedResult<Inspection>> {
        let mut conditions = Vec::new();
        if filter.owner_id.is_some() {
            conditions.push("owner_id = $owner_id");
        }
        if filter.department.is_some() {
            conditions.push("string::lowercase(department) = $department");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let owner_id = filter.owner_id.map(|id| id.to_string());
        let department = filter.department.map(|d| d.to_lowercase());
        let status = filter.status.map(|s| s.as_str().to_string());

        let count_query = format!("SELECT count() AS total FROM inspection{where_clause} GROUP ALL");
        let mut count_builder = self.db.query(&count_query);
        if let Some(ref owner_id) = owner_id {
            count_builder = count_builder.bind(("owner_id", owner_id.clone()));
        }
        if let Some(ref department) = department {
            count_builder = count_builder.bind(("department", department.clone()));
        }
        if let Some(ref status) = status {
            count_builder = count_builder.bind(("status", status.clone()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM inspection{where_clause} \
             ORDER BY date DESC, created_at DESC \
             LIMIT $limit START $offset"
        );
        let mut builder = self
            .db
            .query(&list_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(owner_id) = owner_id {
            builder = builder.bind(("owner_id", owner_id));
        }
        if let Some(department) = department {
            builder = builder.bind(("department", department));
        }
        if let Some(status) = status {
            builder = builder.bind(("status", status));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<InspectionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_inspection())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
