//! Caller identities: inspection owners and administrative reviewers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff member acting on their own records, as established by the
/// staff session layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Owner {
    pub staff_id: Uuid,
    pub department: String,
}

/// Administrative user types allowed to review inspections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReviewerRole {
    /// Department-level reviewer (head of department).
    Supervisor,
    /// Institution-level officer.
    #[serde(rename = "Officers", alias = "Officer")]
    Officer,
}

impl ReviewerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewerRole::Supervisor => "Supervisor",
            ReviewerRole::Officer => "Officers",
        }
    }
}
