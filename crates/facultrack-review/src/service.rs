//! Inspection service — owner edits and the reviewer approval chain.

use chrono::NaiveDate;
use facultrack_auth::ValidatedClaims;
use facultrack_core::error::{FacultrackError, FacultrackResult};
use facultrack_core::models::identity::Owner;
use facultrack_core::models::inspection::{
    CreateInspection, Inspection, InspectionStatus, UpdateInspection,
};
use facultrack_core::repository::{
    InspectionFilter, InspectionRepository, PaginatedResult, Pagination,
};
use facultrack_core::workflow::{self, Transition};
use tracing::info;
use uuid::Uuid;

/// Owner input for a new inspection record.
#[derive(Debug, Clone)]
pub struct InspectionDraft {
    pub date: NaiveDate,
    pub findings: String,
    pub corrective_action: String,
    pub remarks: String,
    pub hod_signature_url: Option<String>,
    pub dean_signature_url: Option<String>,
}

/// Reviewer listing filter. The department is taken from the
/// credential scope when it has one.
#[derive(Debug, Clone, Default)]
pub struct ReviewListing {
    pub owner_id: Option<Uuid>,
    pub department: Option<String>,
    pub status: Option<InspectionStatus>,
}

fn validate_url(field: &str, url: Option<&str>) -> FacultrackResult<()> {
    match url {
        Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => Err(
            FacultrackError::validation(format!("{field} must be an http(s) URL")),
        ),
        _ => Ok(()),
    }
}

/// Reject a caller working from an outdated read before deciding on the
/// transition. The store re-checks the version on write.
fn ensure_version(current: &Inspection, expected_version: u64) -> FacultrackResult<()> {
    if current.version != expected_version {
        return Err(FacultrackError::Conflict {
            entity: "inspection".into(),
            id: current.id.to_string(),
            expected: expected_version,
            actual: current.version,
        });
    }
    Ok(())
}

/// Inspection service.
///
/// Generic over the repository implementation so that the workflow
/// layer has no dependency on the database crate.
pub struct InspectionService<R: InspectionRepository> {
    repo: R,
}

impl<R: InspectionRepository> InspectionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    // -------------------------------------------------------------------
    // Owner operations
    // -------------------------------------------------------------------

    pub async fn create(
        &self,
        owner: &Owner,
        draft: InspectionDraft,
    ) -> FacultrackResult<Inspection> {
        validate_url("hod_signature_url", draft.hod_signature_url.as_deref())?;
        validate_url("dean_signature_url", draft.dean_signature_url.as_deref())?;

        let inspection = self
            .repo
            .create(CreateInspection {
                owner_id: owner.staff_id,
                department: owner.department.clone(),
                date: draft.date,
                findings: draft.findings,
                corrective_action: draft.corrective_action,
                remarks: draft.remarks,
                hod_signature_url: draft.hod_signature_url,
                dean_signature_url: draft.dean_signature_url,
            })
            .await?;

        info!(inspection_id = %inspection.id, owner_id = %owner.staff_id, "Inspection created");
        Ok(inspection)
    }

    /// Fetch a record owned by `owner`. Records owned by someone else
    /// are reported as not found.
    pub async fn get(&self, owner: &Owner, id: Uuid) -> FacultrackResult<Inspection> {
        let inspection = self.repo.get_by_id(id).await?;
        if inspection.owner_id != owner.staff_id {
            return Err(FacultrackError::NotFound {
                entity: "inspection".into(),
                id: id.to_string(),
            });
        }
        Ok(inspection)
    }

    pub async fn list_own(
        &self,
        owner: &Owner,
        pagination: Pagination,
    ) -> FacultrackResult<PaginatedResult<Inspection>> {
        self.repo
            .list(
                InspectionFilter {
                    owner_id: Some(owner.staff_id),
                    ..Default::default()
                },
                pagination,
            )
            .await
    }

    /// Save owner edits. Saving a returned record puts it back to
    /// `Pending`.
    pub async fn update(
        &self,
        owner: &Owner,
        id: Uuid,
        expected_version: u64,
        input: UpdateInspection,
    ) -> FacultrackResult<Inspection> {
        validate_url("hod_signature_url", input.hod_signature_url.clone().flatten().as_deref())?;
        validate_url("dean_signature_url", input.dean_signature_url.clone().flatten().as_deref())?;

        let current = self.get(owner, id).await?;
        ensure_version(&current, expected_version)?;
        let status = workflow::status_after_edit(current.status)?;

        let updated = self
            .repo
            .update_content(id, expected_version, input, status)
            .await?;

        info!(
            inspection_id = %id,
            from = %current.status,
            to = %updated.status,
            "Inspection edited by owner"
        );
        Ok(updated)
    }

    pub async fn delete(
        &self,
        owner: &Owner,
        id: Uuid,
        expected_version: u64,
    ) -> FacultrackResult<()> {
        let current = self.get(owner, id).await?;
        ensure_version(&current, expected_version)?;
        if !current.status.is_editable() {
            return Err(FacultrackError::InvalidTransition {
                from: current.status,
                action: "delete",
            });
        }

        self.repo.delete(id, expected_version).await?;
        info!(inspection_id = %id, owner_id = %owner.staff_id, "Inspection deleted");
        Ok(())
    }

    /// Hand the record to reviewers.
    pub async fn submit(
        &self,
        owner: &Owner,
        id: Uuid,
        expected_version: u64,
    ) -> FacultrackResult<Inspection> {
        let current = self.get(owner, id).await?;
        self.transition(current, expected_version, Transition::Submit)
            .await
    }

    // -------------------------------------------------------------------
    // Reviewer operations
    // -------------------------------------------------------------------

    pub async fn approve_as_hod(
        &self,
        reviewer: &ValidatedClaims,
        id: Uuid,
        expected_version: u64,
    ) -> FacultrackResult<Inspection> {
        self.review(reviewer, id, expected_version, Transition::ApproveAsHod)
            .await
    }

    pub async fn approve_as_dean(
        &self,
        reviewer: &ValidatedClaims,
        id: Uuid,
        expected_version: u64,
    ) -> FacultrackResult<Inspection> {
        self.review(reviewer, id, expected_version, Transition::ApproveAsDean)
            .await
    }

    pub async fn return_with_comment(
        &self,
        reviewer: &ValidatedClaims,
        id: Uuid,
        expected_version: u64,
        comment: &str,
    ) -> FacultrackResult<Inspection> {
        self.review(
            reviewer,
            id,
            expected_version,
            Transition::Return {
                comment: comment.to_string(),
            },
        )
        .await
    }

    /// Apply the reviewer decision that moves the record to `target`.
    pub async fn apply_review(
        &self,
        reviewer: &ValidatedClaims,
        id: Uuid,
        expected_version: u64,
        target: InspectionStatus,
        comment: Option<String>,
    ) -> FacultrackResult<Inspection> {
        let transition = Transition::from_target(target, comment)?;
        self.review(reviewer, id, expected_version, transition).await
    }

    /// Records visible to the reviewer, newest first.
    pub async fn list_for_review(
        &self,
        reviewer: &ValidatedClaims,
        listing: ReviewListing,
        pagination: Pagination,
    ) -> FacultrackResult<PaginatedResult<Inspection>> {
        let department = match (&reviewer.claims().department, listing.department) {
            (Some(scope), Some(requested)) if !scope.eq_ignore_ascii_case(&requested) => {
                return Err(FacultrackError::Forbidden {
                    reason: format!("credential does not cover department '{requested}'"),
                });
            }
            (Some(scope), _) => Some(scope.clone()),
            (None, requested) => requested,
        };

        self.repo
            .list(
                InspectionFilter {
                    owner_id: listing.owner_id,
                    department,
                    status: listing.status,
                },
                pagination,
            )
            .await
    }

    async fn review(
        &self,
        reviewer: &ValidatedClaims,
        id: Uuid,
        expected_version: u64,
        transition: Transition,
    ) -> FacultrackResult<Inspection> {
        let current = self.repo.get_by_id(id).await?;
        if !reviewer.claims().covers_department(&current.department) {
            return Err(FacultrackError::Forbidden {
                reason: format!(
                    "credential does not cover department '{}'",
                    current.department
                ),
            });
        }

        let updated = self.transition(current, expected_version, transition).await?;
        info!(
            inspection_id = %id,
            reviewer = reviewer.identity(),
            role = reviewer.role().as_str(),
            status = %updated.status,
            "Inspection reviewed"
        );
        Ok(updated)
    }

    async fn transition(
        &self,
        current: Inspection,
        expected_version: u64,
        transition: Transition,
    ) -> FacultrackResult<Inspection> {
        // Input errors win over a stale read; everything else waits for it.
        let change = match workflow::apply(current.status, &transition) {
            Err(err @ FacultrackError::Validation { .. }) => return Err(err),
            decision => {
                ensure_version(&current, expected_version)?;
                decision?
            }
        };
        self.repo
            .update_status(current.id, expected_version, change)
            .await
    }
}
