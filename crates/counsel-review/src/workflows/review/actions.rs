use std::fmt;

use serde::Serialize;
use serde_json::json;

use super::domain::RecordId;
use super::list::ListError;
use crate::client::{ApiRequest, FetchError};
use crate::session::AuthScope;

/// Status transitions a review board can offer on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
    Activate,
    Deactivate,
    Cancel,
}

impl ReviewAction {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::Activate => "activate",
            ReviewAction::Deactivate => "deactivate",
            ReviewAction::Cancel => "cancel",
        }
    }

    pub const fn scope(self) -> AuthScope {
        match self {
            ReviewAction::Cancel => AuthScope::Couple,
            _ => AuthScope::Admin,
        }
    }

    /// Request that performs this transition for `id`.
    ///
    /// `reason` is only sent for [`ReviewAction::Reject`].
    pub fn request(self, id: RecordId, reason: Option<&str>) -> ApiRequest {
        match self {
            ReviewAction::Approve => ApiRequest::post(format!("/api/admin/verify-counselor/{id}/")),
            ReviewAction::Reject => ApiRequest::post(format!("/api/admin/reject-counselor/{id}/"))
                .with_json(json!({ "reason": reason.unwrap_or_default() })),
            ReviewAction::Activate => ApiRequest::patch(format!("/api/admin/users/{id}/update/"))
                .with_json(json!({ "is_active": true })),
            ReviewAction::Deactivate => {
                ApiRequest::patch(format!("/api/admin/users/{id}/update/"))
                    .with_json(json!({ "is_active": false }))
            }
            ReviewAction::Cancel => ApiRequest::patch(format!("/api/appointments/{id}/cancel/")),
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A transition that passed its local checks and is waiting on the server.
///
/// While it exists the row is busy and offers no actions.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub id: RecordId,
    pub action: ReviewAction,
    pub request: ApiRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted the transition and the list was refetched.
    Completed { id: RecordId, action: ReviewAction },
    /// The user declined the confirmation or left the reason empty; nothing was sent.
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("record {0} already has an action in flight")]
    InFlight(RecordId),
    #[error("{action} is not available for record {id}")]
    NotOffered { id: RecordId, action: ReviewAction },
    #[error("record {0} is not on the current page")]
    UnknownRecord(RecordId),
    #[error("{0}")]
    Blocked(ListError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;

    #[test]
    fn requests_target_status_endpoints() {
        let approve = ReviewAction::Approve.request(RecordId(7), None);
        assert_eq!(approve.method, Method::Post);
        assert_eq!(approve.path, "/api/admin/verify-counselor/7/");
        assert!(approve.body.is_none());

        let reject = ReviewAction::Reject.request(RecordId(7), Some("incomplete license"));
        assert_eq!(reject.path, "/api/admin/reject-counselor/7/");
        assert_eq!(reject.body, Some(json!({ "reason": "incomplete license" })));

        let deactivate = ReviewAction::Deactivate.request(RecordId(3), None);
        assert_eq!(deactivate.method, Method::Patch);
        assert_eq!(deactivate.path, "/api/admin/users/3/update/");
        assert_eq!(deactivate.body, Some(json!({ "is_active": false })));

        let cancel = ReviewAction::Cancel.request(RecordId(12), None);
        assert_eq!(cancel.method, Method::Patch);
        assert_eq!(cancel.path, "/api/appointments/12/cancel/");
    }

    #[test]
    fn cancel_runs_under_the_couple_scope() {
        assert_eq!(ReviewAction::Cancel.scope(), AuthScope::Couple);
        assert_eq!(ReviewAction::Approve.scope(), AuthScope::Admin);
        assert_eq!(ReviewAction::Activate.scope(), AuthScope::Admin);
    }
}
