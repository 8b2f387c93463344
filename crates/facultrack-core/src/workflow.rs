//! Inspection review workflow.
//!
//! ```text
//! Pending ──submit──▶ Submitted ──approve as HOD──▶ HOD Approved ──approve as Dean──▶ Dean Approved
//!    ▲                    │                              │
//!    │ (owner edits)      └──────return with comment─────┤
//!    │                                                   ▼
//! Returned ◀─────────────────────────────────────────────┘
//!    └──submit──▶ Submitted
//! ```
//!
//! The functions here are pure: they decide whether a transition is
//! legal and what it writes. Persisting the result and checking who is
//! asking is left to the caller.

use crate::error::{FacultrackError, FacultrackResult};
use crate::models::inspection::{InspectionStatus, StatusChange};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Owner hands the record to reviewers.
    Submit,
    ApproveAsHod,
    ApproveAsDean,
    /// Reviewer sends the record back to its owner.
    Return { comment: String },
}

impl Transition {
    pub fn action(&self) -> &'static str {
        match self {
            Transition::Submit => "submit",
            Transition::ApproveAsHod => "approve as HOD",
            Transition::ApproveAsDean => "approve as Dean",
            Transition::Return { .. } => "return",
        }
    }

    /// Map a requested target status to the reviewer transition that
    /// reaches it.
    pub fn from_target(
        target: InspectionStatus,
        comment: Option<String>,
    ) -> FacultrackResult<Self> {
        match target {
            InspectionStatus::HodApproved => Ok(Transition::ApproveAsHod),
            InspectionStatus::DeanApproved => Ok(Transition::ApproveAsDean),
            InspectionStatus::Returned => Ok(Transition::Return {
                comment: comment.unwrap_or_default(),
            }),
            InspectionStatus::Pending | InspectionStatus::Submitted => Err(
                FacultrackError::validation(format!("'{target}' is not a reviewer decision")),
            ),
        }
    }
}

/// Decide whether `transition` may be applied to a record in `current`
/// status and compute the resulting write.
///
/// A return without a comment is rejected before the status is looked
/// at. Nothing leaves a terminal status.
pub fn apply(current: InspectionStatus, transition: &Transition) -> FacultrackResult<StatusChange> {
    use InspectionStatus::*;

    let reviewer_note = match transition {
        Transition::Return { comment } => {
            let comment = comment.trim();
            if comment.is_empty() {
                return Err(FacultrackError::validation(
                    "a comment is required when returning a record",
                ));
            }
            Some(comment.to_string())
        }
        _ => None,
    };

    let (allowed, next) = match transition {
        _ if current.is_terminal() => (false, current),
        Transition::Submit => (matches!(current, Pending | Returned), Submitted),
        Transition::ApproveAsHod => (current == Submitted, HodApproved),
        Transition::ApproveAsDean => (current == HodApproved, DeanApproved),
        Transition::Return { .. } => (matches!(current, Submitted | HodApproved), Returned),
    };

    if !allowed {
        return Err(FacultrackError::InvalidTransition {
            from: current,
            action: transition.action(),
        });
    }

    Ok(StatusChange {
        status: next,
        reviewer_note,
    })
}

/// Status a record takes after its owner saves edits: a returned record
/// goes back to `Pending`, anything else editable keeps its status.
pub fn status_after_edit(current: InspectionStatus) -> FacultrackResult<InspectionStatus> {
    match current {
        InspectionStatus::Pending | InspectionStatus::Returned => Ok(InspectionStatus::Pending),
        other => Err(FacultrackError::InvalidTransition {
            from: other,
            action: "edit",
        }),
    }
}
