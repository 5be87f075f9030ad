use serde_json::json;

use super::common::*;
use crate::session::Session;
use crate::workflows::review::{
    Applied, CounselorApplication, ListError, LoadState, RecordId,
};

#[tokio::test]
async fn expired_session_shows_sign_in_message_without_retry() {
    let transport = ScriptedTransport::new().reply(401, json!({ "detail": "token expired" }));
    let mut board = scripted_board::<CounselorApplication>(transport, admin_session());

    let state = board.refresh().await.clone();
    assert_eq!(state, LoadState::Failed(ListError::SessionExpired));
    let message = board.list().error().expect("failed").message();
    assert!(message.contains("session has expired"));
    assert!(!board.can_retry());
}

#[tokio::test]
async fn forbidden_shows_privilege_message() {
    let transport = ScriptedTransport::new().reply(403, json!({ "detail": "admins only" }));
    let mut board = scripted_board::<CounselorApplication>(transport, admin_session());

    board.refresh().await;
    let err = board.list().error().expect("failed");
    assert_eq!(err, &ListError::Forbidden);
    assert!(err.message().contains("sufficient privileges"));
    assert!(!board.can_retry());
}

#[tokio::test]
async fn couple_token_against_admin_list_is_forbidden() {
    let mut board = demo_board::<CounselorApplication>(Session::in_memory(&[(
        crate::session::AuthScope::Admin,
        COUPLE_TOKEN,
    )]));

    board.refresh().await;
    assert_eq!(board.list().error(), Some(&ListError::Forbidden));
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let mut board = demo_board::<CounselorApplication>(couple_session());

    board.refresh().await;
    assert_eq!(board.list().error(), Some(&ListError::MissingAuth));
    assert!(requests_of(&board).is_empty());
}

#[tokio::test]
async fn generic_failure_keeps_records_and_offers_retry() {
    let transport = ScriptedTransport::new()
        .reply(200, page_body(json!([pending_application(7, "Dana Whitfield")])))
        .reply(500, json!({ "error": "database offline" }))
        .reply(
            200,
            page_body(json!([
                pending_application(7, "Dana Whitfield"),
                pending_application(8, "Luis Carrillo"),
            ])),
        );
    let mut board = scripted_board::<CounselorApplication>(transport, admin_session());

    board.refresh().await;
    board
        .update_filters(|filters| filters.set_search(Some("a")))
        .await;

    let err = board.list().error().expect("failed").clone();
    assert!(err.message().starts_with("Could not load records"));
    assert!(err.message().contains("database offline"));
    assert!(board.can_retry());
    assert_eq!(board.list().records().len(), 1);

    assert_eq!(board.retry().await, &LoadState::Ready);
    assert_eq!(board.list().records().len(), 2);

    let seen = board.client().transport().seen();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[1].query, seen[2].query);
}

#[tokio::test]
async fn network_failure_is_retryable() {
    let transport = ScriptedTransport::new().fail("connection refused");
    let mut board = scripted_board::<CounselorApplication>(transport, admin_session());

    board.refresh().await;
    assert!(matches!(
        board.list().error(),
        Some(ListError::Unavailable { .. })
    ));
    assert!(board.can_retry());
}

#[tokio::test]
async fn bare_array_response_is_one_page() {
    let transport = ScriptedTransport::new().reply(
        200,
        json!([
            pending_application(7, "Dana Whitfield"),
            pending_application(8, "Luis Carrillo"),
        ]),
    );
    let mut board = scripted_board::<CounselorApplication>(transport, admin_session());

    board.refresh().await;
    assert_eq!(board.state(), &LoadState::Ready);
    assert_eq!(board.list().count(), 2);
    assert_eq!(board.list().total_pages(), 1);
}

#[tokio::test]
async fn malformed_body_is_reported_as_load_failure() {
    let transport = ScriptedTransport::new().reply(200, json!({ "unexpected": true }));
    let mut board = scripted_board::<CounselorApplication>(transport, admin_session());

    board.refresh().await;
    assert!(matches!(
        board.list().error(),
        Some(ListError::Unavailable { .. })
    ));
    assert!(board.can_retry());
}

#[tokio::test]
async fn older_response_is_dropped_when_a_newer_fetch_started() {
    let transport = ScriptedTransport::new()
        .reply(200, page_body(json!([pending_application(7, "Dana Whitfield")])))
        .reply(200, page_body(json!([pending_application(9, "Helen Okafor")])));
    let mut board = scripted_board::<CounselorApplication>(transport, admin_session());

    let (older, older_query) = board.begin_fetch();
    let (newer, newer_query) = board.begin_fetch();
    assert_eq!(board.state(), &LoadState::Loading);

    let older_result = board.load(&older_query).await;
    let newer_result = board.load(&newer_query).await;

    assert_eq!(board.apply_fetch(newer, newer_result), Applied::Current);
    assert_eq!(board.apply_fetch(older, older_result), Applied::Stale);
    let ids: Vec<RecordId> = board.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![RecordId(9)]);
}
