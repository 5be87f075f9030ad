use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::repository::{AdminRepository, ApplicationDecision, RepositoryError};
use crate::session::AuthScope;
use crate::workflows::review::{
    matches_search, DashboardStats, Paginated, RecordId, ReviewResource,
};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Bearer tokens the backend accepts. Admin tokens also open couple routes.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    admin_tokens: BTreeSet<String>,
    couple_tokens: BTreeSet<String>,
}

impl AccessPolicy {
    pub fn new<A, C>(admin_tokens: A, couple_tokens: C) -> Self
    where
        A: IntoIterator<Item = String>,
        C: IntoIterator<Item = String>,
    {
        Self {
            admin_tokens: admin_tokens.into_iter().collect(),
            couple_tokens: couple_tokens.into_iter().collect(),
        }
    }

    fn authorize(&self, headers: &HeaderMap, required: AuthScope) -> Result<(), BackendError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(BackendError::Unauthorized)?;

        if self.admin_tokens.contains(token) {
            return Ok(());
        }
        if self.couple_tokens.contains(token) {
            return match required {
                AuthScope::Couple => Ok(()),
                AuthScope::Admin => Err(BackendError::Forbidden),
            };
        }
        Err(BackendError::Unauthorized)
    }
}

pub struct BackendState<R> {
    repository: Arc<R>,
    access: AccessPolicy,
}

impl<R> BackendState<R> {
    pub fn new(repository: Arc<R>, access: AccessPolicy) -> Self {
        Self { repository, access }
    }
}

/// Query parameters accepted by every list route.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    /// Applies the status and search filters, then slices the requested page.
    pub fn paginate<T: ReviewResource>(&self, records: Vec<T>) -> Paginated<T> {
        let status = self.status.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let search = self.search.as_deref().unwrap_or_default();
        let filtered = records
            .into_iter()
            .filter(|record| status.map_or(true, |wanted| record.matches_status(wanted)))
            .filter(|record| matches_search(&record.search_fields(), search))
            .collect();

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Paginated::from_records(filtered, self.page.unwrap_or(1), limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct RejectBody {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdateBody {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
struct Acknowledged<T> {
    status: &'static str,
    record: T,
}

#[derive(Debug)]
pub enum BackendError {
    Unauthorized,
    Forbidden,
    BadRequest(String),
    Repository(RepositoryError),
}

impl From<RepositoryError> for BackendError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            BackendError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "authentication credentials were not provided or have expired".to_string(),
            ),
            BackendError::Forbidden => (
                StatusCode::FORBIDDEN,
                "you do not have permission to perform this action".to_string(),
            ),
            BackendError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            BackendError::Repository(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "record not found".to_string())
            }
            BackendError::Repository(err @ RepositoryError::InvalidTransition(_)) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            BackendError::Repository(err @ RepositoryError::Unavailable(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type Shared<R> = State<Arc<BackendState<R>>>;

// Path, query, and body are decoded only after `authorize`.

fn record_id(raw: &str) -> Result<RecordId, BackendError> {
    raw.trim()
        .parse()
        .map(RecordId)
        .map_err(|_| BackendError::BadRequest(format!("invalid record id: {raw}")))
}

fn list_params(uri: &Uri) -> Result<ListParams, BackendError> {
    Query::<ListParams>::try_from_uri(uri)
        .map(|Query(params)| params)
        .map_err(|rejection| BackendError::BadRequest(rejection.body_text()))
}

fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, BackendError> {
    serde_json::from_slice(body)
        .map_err(|err| BackendError::BadRequest(format!("invalid request body: {err}")))
}

/// Router serving the admin, appointment, and dashboard endpoints the review client calls.
pub fn admin_router<R>(state: BackendState<R>) -> Router
where
    R: AdminRepository + 'static,
{
    Router::new()
        .route(
            "/api/admin/counselor-applications/",
            get(list_applications::<R>),
        )
        .route("/api/admin/counselors/", get(list_counselors::<R>))
        .route("/api/admin/couples/", get(list_couples::<R>))
        .route("/api/admin/users/", get(list_users::<R>))
        .route("/api/admin/users/:id/update/", patch(update_user::<R>))
        .route(
            "/api/admin/verify-counselor/:id/",
            post(verify_counselor::<R>),
        )
        .route(
            "/api/admin/reject-counselor/:id/",
            post(reject_counselor::<R>),
        )
        .route("/api/admin/dashboard/stats/", get(dashboard_stats::<R>))
        .route("/api/appointments/", get(list_appointments::<R>))
        .route(
            "/api/appointments/:id/cancel/",
            patch(cancel_appointment::<R>),
        )
        .with_state(Arc::new(state))
}

pub(crate) async fn list_applications<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Admin)?;
    let params = list_params(&uri)?;
    let page = params.paginate(state.repository.applications()?);
    Ok(Json(page).into_response())
}

pub(crate) async fn list_counselors<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Admin)?;
    let params = list_params(&uri)?;
    let page = params.paginate(state.repository.counselors()?);
    Ok(Json(page).into_response())
}

pub(crate) async fn list_couples<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Admin)?;
    let params = list_params(&uri)?;
    let page = params.paginate(state.repository.couples()?);
    Ok(Json(page).into_response())
}

pub(crate) async fn list_users<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Admin)?;
    let params = list_params(&uri)?;
    let page = params.paginate(state.repository.users()?);
    Ok(Json(page).into_response())
}

pub(crate) async fn list_appointments<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Couple)?;
    let params = list_params(&uri)?;
    let page = params.paginate(state.repository.appointments()?);
    Ok(Json(page).into_response())
}

pub(crate) async fn verify_counselor<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Admin)?;
    let id = record_id(&raw_id)?;
    let record = state
        .repository
        .decide_application(id, ApplicationDecision::Approve)?;
    info!(id = id.0, "counselor application approved");
    Ok(Json(Acknowledged {
        status: "approved",
        record,
    })
    .into_response())
}

pub(crate) async fn reject_counselor<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Admin)?;
    let id = record_id(&raw_id)?;
    let body: RejectBody = json_body(&body)?;
    let reason = body.reason.trim().to_string();
    if reason.is_empty() {
        return Err(BackendError::BadRequest(
            "a rejection reason is required".to_string(),
        ));
    }
    let record = state
        .repository
        .decide_application(id, ApplicationDecision::Reject { reason })?;
    info!(id = id.0, "counselor application rejected");
    Ok(Json(Acknowledged {
        status: "rejected",
        record,
    })
    .into_response())
}

pub(crate) async fn update_user<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Admin)?;
    let id = record_id(&raw_id)?;
    let body: UserUpdateBody = json_body(&body)?;
    let record = state.repository.set_user_active(id, body.is_active)?;
    info!(id = id.0, is_active = body.is_active, "user activation updated");
    Ok(Json(Acknowledged {
        status: "updated",
        record,
    })
    .into_response())
}

pub(crate) async fn cancel_appointment<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Response, BackendError> {
    state.access.authorize(&headers, AuthScope::Couple)?;
    let id = record_id(&raw_id)?;
    let record = state.repository.cancel_appointment(id)?;
    info!(id = id.0, "appointment cancelled");
    Ok(Json(Acknowledged {
        status: "cancelled",
        record,
    })
    .into_response())
}

pub(crate) async fn dashboard_stats<R: AdminRepository + 'static>(
    State(state): Shared<R>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, BackendError> {
    state.access.authorize(&headers, AuthScope::Admin)?;
    Ok(Json(state.repository.stats()?))
}
