// src/models/mod.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ───────────────────────────────────────
// Enumerations
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Department {
    Roads,
    Water,
    Electricity,
    Sanitation,
    PublicSafety,
    Other,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Roads,
        Department::Water,
        Department::Electricity,
        Department::Sanitation,
        Department::PublicSafety,
        Department::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Department::Roads => "roads",
            Department::Water => "water",
            Department::Electricity => "electricity",
            Department::Sanitation => "sanitation",
            Department::PublicSafety => "public-safety",
            Department::Other => "other",
        }
    }

    /// Readable label used in notification bodies and dashboards.
    pub const fn display_name(self) -> &'static str {
        match self {
            Department::Roads => "Roads & Infrastructure",
            Department::Water => "Water Supply",
            Department::Electricity => "Electricity",
            Department::Sanitation => "Sanitation & Waste",
            Department::PublicSafety => "Public Safety",
            Department::Other => "General Enquiries",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in-progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Rejected => "rejected",
        }
    }

    /// Workflow transition table. Resolved and rejected complaints reopen
    /// through in-progress only; a status never transitions to itself.
    pub fn can_transition_to(self, next: ComplaintStatus) -> bool {
        use ComplaintStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Resolved)
                | (Pending, Rejected)
                | (InProgress, Pending)
                | (InProgress, Resolved)
                | (InProgress, Rejected)
                | (Resolved, InProgress)
                | (Rejected, InProgress)
        )
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

// ───────────────────────────────────────
// Complaints
// ───────────────────────────────────────

/// One staff response in a complaint's append-only history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntry {
    pub timestamp: DateTime<Utc>,
    pub author: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub citizen_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Department,
    pub subject: String,
    pub description: String,
    pub location: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Latest staff response; mirrors the tail of `responses`.
    pub response_message: Option<String>,
    /// Full response history, oldest first. Absent in older snapshots.
    #[serde(default)]
    pub responses: Vec<ResponseEntry>,
    pub assigned_to: Option<String>,
}

/// Citizen-supplied fields for a new complaint. Validation (required fields,
/// email shape, description length) happens in the handler layer before this
/// reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    pub citizen_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Department,
    pub subject: String,
    pub description: String,
    pub location: Option<String>,
}

// ───────────────────────────────────────
// Staff (static directory, see auth)
// ───────────────────────────────────────
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    pub id: String,
    pub username: String,
    /// SHA-256 hex digest of the password. The directory is a fixed seeded
    /// list, not a real credential store.
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub department: Department,
    pub role: Role,
    pub name: String,
}

impl StaffUser {
    /// Department this user's queries are scoped to; admins see everything.
    pub fn department_scope(&self) -> Option<Department> {
        match self.role {
            Role::Admin => None,
            Role::Staff => Some(self.department),
        }
    }
}

// ───────────────────────────────────────
// DTOs helpful for endpoints
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub rejected: usize,
    /// department code -> complaint count
    pub department_counts: HashMap<String, usize>,
    /// Five most recently filed complaints in scope, newest first.
    pub recent: Vec<Complaint>,
}
