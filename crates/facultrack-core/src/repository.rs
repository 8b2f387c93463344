//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Every write takes the version
//! the caller last read and fails with
//! [`FacultrackError::Conflict`](crate::error::FacultrackError::Conflict)
//! when the stored record has moved on.

use uuid::Uuid;

use crate::error::FacultrackResult;
use crate::models::inspection::{
    CreateInspection, Inspection, InspectionStatus, StatusChange, UpdateInspection,
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Optional filters for inspection listings. `None` fields match all.
#[derive(Debug, Clone, Default)]
pub struct InspectionFilter {
    pub owner_id: Option<Uuid>,
    pub department: Option<String>,
    pub status: Option<InspectionStatus>,
}

pub trait InspectionRepository: Send + Sync {
    /// Insert a new record with status `Pending` and version 1.
    fn create(
        &self,
        input: CreateInspection,
    ) -> impl Future<Output = FacultrackResult<Inspection>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FacultrackResult<Inspection>> + Send;
    /// Overwrite content fields and set `status` in one versioned write.
    fn update_content(
        &self,
        id: Uuid,
        expected_version: u64,
        input: UpdateInspection,
        status: InspectionStatus,
    ) -> impl Future<Output = FacultrackResult<Inspection>> + Send;
    fn update_status(
        &self,
        id: Uuid,
        expected_version: u64,
        change: StatusChange,
    ) -> impl Future<Output = FacultrackResult<Inspection>> + Send;
    /// Hard delete.
    fn delete(
        &self,
        id: Uuid,
        expected_version: u64,
    ) -> impl Future<Output = FacultrackResult<()>> + Send;
    /// Records matching `filter`, newest inspection date first.
    fn list(
        &self,
        filter: InspectionFilter,
        pagination: Pagination,
    ) -> impl Future<Output = FacultrackResult<PaginatedResult<Inspection>>> + Send;
}
