use serde::de::DeserializeOwned;

use super::actions::ReviewAction;
use super::domain::{
    AdminUser, Appointment, AppointmentStatus, Counselor, CounselorApplication, Couple, RecordId,
    VerificationStatus,
};
use crate::session::AuthScope;

/// A collection a review board can list and act on.
pub trait ReviewResource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// List endpoint, with trailing slash.
    const COLLECTION: &'static str;
    const SCOPE: AuthScope;

    fn record_id(&self) -> RecordId;

    fn status_label(&self) -> &'static str;

    /// Actions for the record's current state. Called on every render.
    fn offered_actions(&self) -> Vec<ReviewAction> {
        Vec::new()
    }

    fn matches_status(&self, wanted: &str) -> bool {
        self.status_label().eq_ignore_ascii_case(wanted.trim())
    }

    /// Name and email fields free-text search runs over.
    fn search_fields(&self) -> Vec<&str>;

    fn category(&self) -> Option<&str> {
        None
    }

    /// Local state change to show before the server reconciles it.
    ///
    /// Returns `false` when the action has no optimistic form.
    fn apply_optimistic(&mut self, _action: ReviewAction) -> bool {
        false
    }
}

/// Case-insensitive substring match over `fields`.
pub fn matches_search(fields: &[&str], needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

impl ReviewResource for CounselorApplication {
    const COLLECTION: &'static str = "/api/admin/counselor-applications/";
    const SCOPE: AuthScope = AuthScope::Admin;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn offered_actions(&self) -> Vec<ReviewAction> {
        match self.status {
            VerificationStatus::Pending => vec![ReviewAction::Approve, ReviewAction::Reject],
            _ => Vec::new(),
        }
    }

    fn matches_status(&self, wanted: &str) -> bool {
        self.status.matches_label(wanted)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.email.as_str()]
    }

    fn category(&self) -> Option<&str> {
        self.specialization.as_deref()
    }
}

impl ReviewResource for Counselor {
    const COLLECTION: &'static str = "/api/admin/counselors/";
    const SCOPE: AuthScope = AuthScope::Admin;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn matches_status(&self, wanted: &str) -> bool {
        self.status.matches_label(wanted)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.email.as_str()]
    }

    fn category(&self) -> Option<&str> {
        self.specialization.as_deref()
    }
}

impl ReviewResource for Couple {
    const COLLECTION: &'static str = "/api/admin/couples/";
    const SCOPE: AuthScope = AuthScope::Admin;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.partner_one.full_name.as_str(),
            self.partner_one.email.as_str(),
        ];
        if let Some(partner) = &self.partner_two {
            fields.push(partner.full_name.as_str());
            fields.push(partner.email.as_str());
        }
        fields
    }
}

impl ReviewResource for AdminUser {
    const COLLECTION: &'static str = "/api/admin/users/";
    const SCOPE: AuthScope = AuthScope::Admin;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn status_label(&self) -> &'static str {
        AdminUser::status_label(self)
    }

    fn offered_actions(&self) -> Vec<ReviewAction> {
        if self.is_active {
            vec![ReviewAction::Deactivate]
        } else {
            vec![ReviewAction::Activate]
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.email.as_str()]
    }
}

impl ReviewResource for Appointment {
    const COLLECTION: &'static str = "/api/appointments/";
    const SCOPE: AuthScope = AuthScope::Couple;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn status_label(&self) -> &'static str {
        self.status.display().label()
    }

    fn offered_actions(&self) -> Vec<ReviewAction> {
        if self.status.is_cancellable() {
            vec![ReviewAction::Cancel]
        } else {
            Vec::new()
        }
    }

    /// Accepts either the server status or the status shown to users.
    fn matches_status(&self, wanted: &str) -> bool {
        let wanted = wanted.trim();
        self.status.label().eq_ignore_ascii_case(wanted)
            || self.status.display().label().eq_ignore_ascii_case(wanted)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.couple_name.as_str(), self.counselor_name.as_str()]
    }

    fn apply_optimistic(&mut self, action: ReviewAction) -> bool {
        if action == ReviewAction::Cancel && self.status.is_cancellable() {
            self.status = AppointmentStatus::Cancelled;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::review::domain::UserRole;

    fn application(status: VerificationStatus) -> CounselorApplication {
        CounselorApplication {
            id: RecordId(7),
            full_name: "Dana Whitfield".to_string(),
            email: "dana@example.com".to_string(),
            phone: None,
            license_number: Some("LMFT-1193".to_string()),
            specialization: Some("Family Therapy".to_string()),
            years_experience: Some(9),
            submitted_at: None,
            status,
            rejection_reason: None,
        }
    }

    #[test]
    fn only_pending_applications_offer_review_actions() {
        assert_eq!(
            application(VerificationStatus::Pending).offered_actions(),
            vec![ReviewAction::Approve, ReviewAction::Reject]
        );
        for status in [
            VerificationStatus::Approved,
            VerificationStatus::Rejected,
            VerificationStatus::Suspended,
        ] {
            assert!(application(status).offered_actions().is_empty());
        }
    }

    #[test]
    fn user_toggle_tracks_active_flag() {
        let mut user = AdminUser {
            id: RecordId(3),
            email: "sam@example.com".to_string(),
            full_name: "Sam Ortiz".to_string(),
            role: UserRole::Couple,
            is_active: true,
            date_joined: None,
        };
        assert_eq!(user.offered_actions(), vec![ReviewAction::Deactivate]);
        user.is_active = false;
        assert_eq!(user.offered_actions(), vec![ReviewAction::Activate]);
        assert!(user.matches_status("inactive"));
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_email() {
        let record = application(VerificationStatus::Pending);
        assert!(matches_search(&record.search_fields(), "WHITFIELD"));
        assert!(matches_search(&record.search_fields(), "dana@"));
        assert!(!matches_search(&record.search_fields(), "nobody"));
        assert!(matches_search(&record.search_fields(), "  "));
    }
}
