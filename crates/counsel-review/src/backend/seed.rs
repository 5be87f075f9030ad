use chrono::{Duration, Utc};

use super::repository::{AdminDataset, MemoryAdminRepository};
use crate::workflows::review::{
    AdminUser, Appointment, AppointmentStatus, Counselor, CounselorApplication, Couple,
    CoupleStatus, Partner, RecordId, UserRole, VerificationStatus,
};

fn partner(name: &str, email: &str) -> Partner {
    Partner {
        full_name: name.to_string(),
        email: email.to_string(),
    }
}

fn application(
    id: u64,
    name: &str,
    email: &str,
    specialization: &str,
    status: VerificationStatus,
    days_ago: i64,
) -> CounselorApplication {
    CounselorApplication {
        id: RecordId(id),
        full_name: name.to_string(),
        email: email.to_string(),
        phone: Some(format!("+1-515-555-01{id:02}")),
        license_number: Some(format!("LMFT-{:04}", 1000 + id * 37)),
        specialization: Some(specialization.to_string()),
        years_experience: Some((3 + id % 12) as u8),
        submitted_at: Some(Utc::now() - Duration::days(days_ago)),
        status,
        rejection_reason: None,
    }
}

fn user(id: u64, name: &str, email: &str, role: UserRole, is_active: bool) -> AdminUser {
    AdminUser {
        id: RecordId(id),
        email: email.to_string(),
        full_name: name.to_string(),
        role,
        is_active,
        date_joined: Some(Utc::now() - Duration::days(30 + id as i64)),
    }
}

/// Small dataset for local runs and the CLI demo.
///
/// Application 7 is pending so the approve walkthrough has something to act on.
pub fn demo_dataset() -> AdminDataset {
    let now = Utc::now();

    let applications = vec![
        application(
            3,
            "Priya Natarajan",
            "priya.natarajan@example.com",
            "Premarital Counseling",
            VerificationStatus::Approved,
            40,
        ),
        application(
            5,
            "Marcus Bell",
            "marcus.bell@example.com",
            "Family Therapy",
            VerificationStatus::Rejected,
            21,
        ),
        application(
            7,
            "Dana Whitfield",
            "dana.whitfield@example.com",
            "Family Therapy",
            VerificationStatus::Pending,
            4,
        ),
        application(
            8,
            "Luis Carrillo",
            "luis.carrillo@example.com",
            "Conflict Resolution",
            VerificationStatus::Pending,
            2,
        ),
        application(
            9,
            "Helen Okafor",
            "helen.okafor@example.com",
            "Grief & Loss",
            VerificationStatus::Pending,
            1,
        ),
    ];

    let counselors = vec![
        Counselor {
            id: RecordId(1),
            full_name: "Priya Natarajan".to_string(),
            email: "priya.natarajan@example.com".to_string(),
            specialization: Some("Premarital Counseling".to_string()),
            status: VerificationStatus::Approved,
            active_couples: 2,
        },
        Counselor {
            id: RecordId(2),
            full_name: "Owen Fairbanks".to_string(),
            email: "owen.fairbanks@example.com".to_string(),
            specialization: Some("Communication".to_string()),
            status: VerificationStatus::Suspended,
            active_couples: 0,
        },
    ];

    let couples = vec![
        Couple {
            id: RecordId(11),
            partner_one: partner("Ana Reyes", "ana.reyes@example.com"),
            partner_two: Some(partner("Tom Reyes", "tom.reyes@example.com")),
            status: CoupleStatus::Active,
            assessments_completed: 3,
            total_assessments: 5,
            counselor_name: Some("Priya Natarajan".to_string()),
        },
        Couple {
            id: RecordId(12),
            partner_one: partner("Jordan Lee", "jordan.lee@example.com"),
            partner_two: None,
            status: CoupleStatus::PendingInvite,
            assessments_completed: 0,
            total_assessments: 5,
            counselor_name: None,
        },
        Couple {
            id: RecordId(13),
            partner_one: partner("Mia Chen", "mia.chen@example.com"),
            partner_two: Some(partner("Noah Chen", "noah.chen@example.com")),
            status: CoupleStatus::Inactive,
            assessments_completed: 5,
            total_assessments: 5,
            counselor_name: Some("Priya Natarajan".to_string()),
        },
    ];

    let users = vec![
        user(21, "Ana Reyes", "ana.reyes@example.com", UserRole::Couple, true),
        user(22, "Tom Reyes", "tom.reyes@example.com", UserRole::Couple, true),
        user(23, "Jordan Lee", "jordan.lee@example.com", UserRole::Couple, false),
        user(
            24,
            "Priya Natarajan",
            "priya.natarajan@example.com",
            UserRole::Counselor,
            true,
        ),
        user(25, "Site Admin", "admin@example.com", UserRole::Admin, true),
    ];

    let appointment =
        |id: u64, couple: u64, couple_name: &str, days: i64, status: AppointmentStatus| {
            Appointment {
                id: RecordId(id),
                couple_id: RecordId(couple),
                couple_name: couple_name.to_string(),
                counselor_id: RecordId(1),
                counselor_name: "Priya Natarajan".to_string(),
                scheduled_at: now + Duration::days(days),
                duration_minutes: Some(50),
                status,
            }
        };
    let appointments = vec![
        appointment(31, 11, "Ana & Tom Reyes", 3, AppointmentStatus::Scheduled),
        appointment(32, 11, "Ana & Tom Reyes", 10, AppointmentStatus::Confirmed),
        appointment(33, 11, "Ana & Tom Reyes", -7, AppointmentStatus::Completed),
        appointment(34, 13, "Mia & Noah Chen", -2, AppointmentStatus::Cancelled),
    ];

    AdminDataset {
        applications,
        counselors,
        couples,
        users,
        appointments,
    }
}

pub fn demo_repository() -> MemoryAdminRepository {
    MemoryAdminRepository::new(demo_dataset())
}
