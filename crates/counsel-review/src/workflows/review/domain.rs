use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned primary key shared by every admin-managed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Admin-controlled verification state of a counselor.
///
/// Some endpoints report an approved counselor as `verified`; both spellings
/// deserialize to [`VerificationStatus::Approved`] and it always serializes as
/// `approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    #[serde(alias = "verified")]
    Approved,
    Rejected,
    Suspended,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
            VerificationStatus::Suspended => "suspended",
        }
    }

    /// Accepts the canonical label or the `verified` alias.
    pub fn matches_label(self, wanted: &str) -> bool {
        let wanted = wanted.trim();
        wanted.eq_ignore_ascii_case(self.label())
            || (self == VerificationStatus::Approved && wanted.eq_ignore_ascii_case("verified"))
    }
}

/// A counselor's request for platform verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounselorApplication {
    pub id: RecordId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub years_experience: Option<u8>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Verified counselor listing shown on the admin counselors view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counselor {
    pub id: RecordId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub specialization: Option<String>,
    pub status: VerificationStatus,
    #[serde(default)]
    pub active_couples: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoupleStatus {
    Active,
    PendingInvite,
    Inactive,
}

impl CoupleStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CoupleStatus::Active => "active",
            CoupleStatus::PendingInvite => "pending_invite",
            CoupleStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub full_name: String,
    pub email: String,
}

/// Two linked accounts sharing assessment and appointment data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Couple {
    pub id: RecordId,
    pub partner_one: Partner,
    /// Absent until the invited partner accepts.
    #[serde(default)]
    pub partner_two: Option<Partner>,
    pub status: CoupleStatus,
    #[serde(default)]
    pub assessments_completed: u32,
    #[serde(default)]
    pub total_assessments: u32,
    #[serde(default)]
    pub counselor_name: Option<String>,
}

impl Couple {
    /// Whole-number assessment completion, 0 when no assessments are assigned.
    pub fn progress_percent(&self) -> u8 {
        if self.total_assessments == 0 {
            return 0;
        }
        let completed = self.assessments_completed.min(self.total_assessments) as u64;
        ((completed * 100) / self.total_assessments as u64) as u8
    }

    pub fn display_name(&self) -> String {
        match &self.partner_two {
            Some(partner) => format!("{} & {}", self.partner_one.full_name, partner.full_name),
            None => self.partner_one.full_name.clone(),
        }
    }
}

/// Appointment status as stored by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub const fn display(self) -> DisplayStatus {
        match self {
            AppointmentStatus::Scheduled => DisplayStatus::Pending,
            AppointmentStatus::Confirmed => DisplayStatus::Confirmed,
            AppointmentStatus::Completed => DisplayStatus::Completed,
            AppointmentStatus::Cancelled => DisplayStatus::Cancelled,
        }
    }

    pub const fn is_cancellable(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
        )
    }
}

/// Appointment status shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Confirmed,
    Pending,
    Completed,
    Cancelled,
}

impl DisplayStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DisplayStatus::Confirmed => "confirmed",
            DisplayStatus::Pending => "pending",
            DisplayStatus::Completed => "completed",
            DisplayStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub couple_id: RecordId,
    pub couple_name: String,
    pub counselor_id: RecordId,
    pub counselor_name: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Couple,
    Counselor,
    Admin,
}

/// Account row on the admin users view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: RecordId,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

impl AdminUser {
    pub const fn status_label(&self) -> &'static str {
        if self.is_active {
            "active"
        } else {
            "inactive"
        }
    }
}
