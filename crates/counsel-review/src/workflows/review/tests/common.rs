use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backend::{
    admin_router, demo_repository, AccessPolicy, AdminDataset, BackendState,
    MemoryAdminRepository,
};
use crate::client::{
    ApiClient, ApiRequest, ApiResponse, RecordingTransport, RouterTransport, Transport,
    TransportError,
};
use crate::config::ReviewConfig;
use crate::session::{AuthScope, Session};
use crate::workflows::review::{AdminUser, RecordId, ReviewBoard, ReviewResource, UserRole};

pub(super) const ADMIN_TOKEN: &str = "admin-secret";
pub(super) const COUPLE_TOKEN: &str = "couple-secret";

pub(super) type DemoTransport = RecordingTransport<RouterTransport>;

pub(super) fn admin_session() -> Session {
    Session::in_memory(&[(AuthScope::Admin, ADMIN_TOKEN)])
}

pub(super) fn couple_session() -> Session {
    Session::in_memory(&[(AuthScope::Couple, COUPLE_TOKEN)])
}

pub(super) fn router_transport(repository: MemoryAdminRepository) -> DemoTransport {
    let access = AccessPolicy::new([ADMIN_TOKEN.to_string()], [COUPLE_TOKEN.to_string()]);
    let router = admin_router(BackendState::new(Arc::new(repository), access));
    RecordingTransport::new(RouterTransport::new(router))
}

pub(super) fn board_over<R: ReviewResource>(
    repository: MemoryAdminRepository,
    session: Session,
) -> ReviewBoard<R, DemoTransport> {
    configured_board(repository, session, &ReviewConfig::default())
}

pub(super) fn configured_board<R: ReviewResource>(
    repository: MemoryAdminRepository,
    session: Session,
    config: &ReviewConfig,
) -> ReviewBoard<R, DemoTransport> {
    let client = ApiClient::new(router_transport(repository), session);
    ReviewBoard::new(Arc::new(client), config)
}

pub(super) fn demo_board<R: ReviewResource>(session: Session) -> ReviewBoard<R, DemoTransport> {
    board_over(demo_repository(), session)
}

pub(super) fn numbered_users(count: u64) -> MemoryAdminRepository {
    MemoryAdminRepository::new(AdminDataset {
        users: (1..=count)
            .map(|id| AdminUser {
                id: RecordId(id),
                email: format!("member{id}@example.com"),
                full_name: format!("Member {id}"),
                role: UserRole::Couple,
                is_active: true,
                date_joined: None,
            })
            .collect(),
        ..AdminDataset::default()
    })
}

pub(super) fn requests_of<R>(board: &ReviewBoard<R, DemoTransport>) -> Vec<ApiRequest>
where
    R: ReviewResource,
{
    board.client().transport().requests()
}

/// Replays canned responses in order; fails once the script runs out.
#[derive(Default)]
pub(super) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn reply(self, status: u16, body: Value) -> Self {
        self.replies
            .lock()
            .expect("script mutex poisoned")
            .push_back(Ok(ApiResponse {
                status,
                body: serde_json::to_vec(&body).expect("serialize reply"),
            }));
        self
    }

    pub(super) fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .expect("script mutex poisoned")
            .push_back(Err(TransportError::Network(message.to_string())));
        self
    }

    pub(super) fn seen(&self) -> Vec<ApiRequest> {
        self.seen.lock().expect("request mutex poisoned").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.seen
            .lock()
            .expect("request mutex poisoned")
            .push(request);
        self.replies
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".to_string())))
    }
}

pub(super) fn scripted_board<R: ReviewResource>(
    transport: ScriptedTransport,
    session: Session,
) -> ReviewBoard<R, ScriptedTransport> {
    ReviewBoard::new(
        Arc::new(ApiClient::new(transport, session)),
        &ReviewConfig::default(),
    )
}

pub(super) fn page_body(results: Value) -> Value {
    let count = results.as_array().map_or(0, Vec::len);
    json!({
        "count": count,
        "page": 1,
        "limit": 20,
        "total_pages": 1,
        "results": results,
    })
}

pub(super) fn pending_application(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "full_name": name,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "specialization": "Family Therapy",
        "status": "pending",
    })
}

pub(super) fn scheduled_appointment(id: u64) -> Value {
    json!({
        "id": id,
        "couple_id": 11,
        "couple_name": "Ana & Tom Reyes",
        "counselor_id": 1,
        "counselor_name": "Priya Natarajan",
        "scheduled_at": "2026-11-02T15:00:00Z",
        "status": "scheduled",
    })
}
