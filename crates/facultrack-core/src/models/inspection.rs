//! Inspection record domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FacultrackError;

/// Review status of an inspection record.
///
/// Stored and transmitted using the labels shown to staff and
/// reviewers (`"HOD Approved"`, not `"HodApproved"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum InspectionStatus {
    #[default]
    Pending,
    Submitted,
    #[serde(rename = "HOD Approved")]
    HodApproved,
    #[serde(rename = "Dean Approved")]
    DeanApproved,
    Returned,
}

impl InspectionStatus {
    pub const ALL: [InspectionStatus; 5] = [
        InspectionStatus::Pending,
        InspectionStatus::Submitted,
        InspectionStatus::HodApproved,
        InspectionStatus::DeanApproved,
        InspectionStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pending => "Pending",
            InspectionStatus::Submitted => "Submitted",
            InspectionStatus::HodApproved => "HOD Approved",
            InspectionStatus::DeanApproved => "Dean Approved",
            InspectionStatus::Returned => "Returned",
        }
    }

    /// The owner may change content fields or delete the record.
    pub fn is_editable(&self) -> bool {
        matches!(self, InspectionStatus::Pending | InspectionStatus::Returned)
    }

    /// No transition leaves this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InspectionStatus::DeanApproved)
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InspectionStatus {
    type Err = FacultrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InspectionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| FacultrackError::validation(format!("unknown inspection status: {s}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    /// Staff member who created the record.
    pub owner_id: Uuid,
    /// Department of the owner at creation time; reviewer scope is
    /// checked against this value.
    pub department: String,
    pub date: NaiveDate,
    pub findings: String,
    pub corrective_action: String,
    pub remarks: String,
    pub hod_signature_url: Option<String>,
    pub dean_signature_url: Option<String>,
    pub status: InspectionStatus,
    /// Last comment left by a reviewer when returning the record.
    pub reviewer_note: Option<String>,
    /// Optimistic concurrency counter, bumped by every write.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInspection {
    pub owner_id: Uuid,
    pub department: String,
    pub date: NaiveDate,
    pub findings: String,
    pub corrective_action: String,
    pub remarks: String,
    pub hod_signature_url: Option<String>,
    pub dean_signature_url: Option<String>,
}

/// Owner-editable content fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateInspection {
    pub date: Option<NaiveDate>,
    pub findings: Option<String>,
    pub corrective_action: Option<String>,
    pub remarks: Option<String>,
    /// `Some(Some(url))` = set, `Some(None)` = clear, `None` = no change.
    pub hod_signature_url: Option<Option<String>>,
    /// `Some(Some(url))` = set, `Some(None)` = clear, `None` = no change.
    pub dean_signature_url: Option<Option<String>>,
}

/// A status write computed by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: InspectionStatus,
    /// `Some` overwrites the stored reviewer note; `None` leaves it as is.
    pub reviewer_note: Option<String>,
}
