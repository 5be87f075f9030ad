use std::time::Duration;

use super::common::*;
use crate::backend::demo_repository;
use crate::client::Method;
use crate::config::ReviewConfig;
use crate::workflows::review::{
    AdminUser, Appointment, CounselorApplication, LoadState, RecordId, ReviewAction,
};

#[tokio::test]
async fn first_filter_update_loads_page_one() {
    let mut board = demo_board::<CounselorApplication>(admin_session());
    assert_eq!(board.state(), &LoadState::Idle);

    let state = board.update_filters(|_| {}).await;
    assert_eq!(state, &LoadState::Ready);
    assert_eq!(board.list().count(), 5);

    let requests = requests_of(&board);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].path, "/api/admin/counselor-applications/");
    assert_eq!(requests[0].query_value("page"), Some("1"));
    assert_eq!(requests[0].query_value("limit"), Some("20"));
    assert_eq!(requests[0].bearer.as_deref(), Some(ADMIN_TOKEN));
}

#[tokio::test]
async fn forty_seven_users_span_three_pages() {
    let mut board = board_over::<AdminUser>(numbered_users(47), admin_session());

    board.refresh().await;
    assert_eq!(board.list().total_pages(), 3);
    assert_eq!(board.list().records().len(), 20);

    board.go_to_page(3).await;
    assert_eq!(board.list().page(), 3);
    assert_eq!(board.list().count(), 47);
    let ids: Vec<u64> = board.list().records().iter().map(|user| user.id.0).collect();
    assert_eq!(ids, (41..=47).collect::<Vec<_>>());
}

#[tokio::test]
async fn changing_a_filter_returns_to_page_one() {
    let mut board = board_over::<AdminUser>(numbered_users(47), admin_session());
    board.refresh().await;
    board.go_to_page(2).await;
    assert_eq!(board.filters().page(), 2);

    board
        .update_filters(|filters| filters.set_search(Some("member4")))
        .await;
    assert_eq!(board.filters().page(), 1);

    let last = requests_of(&board).pop().expect("refetch sent");
    assert_eq!(last.query_value("page"), Some("1"));
    assert_eq!(last.query_value("search"), Some("member4"));
    // member4 and member40..=47
    assert_eq!(board.list().count(), 9);
}

#[tokio::test]
async fn paging_keeps_the_active_filters() {
    let mut board = board_over::<AdminUser>(numbered_users(47), admin_session());
    board
        .update_filters(|filters| filters.set_search(Some("member")))
        .await;
    board.go_to_page(2).await;

    let last = requests_of(&board).pop().expect("page request sent");
    assert_eq!(last.query_value("page"), Some("2"));
    assert_eq!(last.query_value("search"), Some("member"));
}

#[tokio::test]
async fn unchanged_filters_do_not_refetch() {
    let mut board = demo_board::<CounselorApplication>(admin_session());
    board.refresh().await;

    board.update_filters(|filters| filters.set_page(1)).await;
    assert_eq!(requests_of(&board).len(), 1);
}

#[tokio::test]
async fn status_filter_narrows_applications() {
    let mut board = demo_board::<CounselorApplication>(admin_session());
    board
        .update_filters(|filters| filters.set_status(Some("pending")))
        .await;

    let ids: Vec<RecordId> = board.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![RecordId(7), RecordId(8), RecordId(9)]);
    assert!(board
        .rows()
        .iter()
        .all(|row| row.actions == vec![ReviewAction::Approve, ReviewAction::Reject]));
}

#[tokio::test]
async fn category_filter_narrows_rows_without_a_request() {
    let mut board = demo_board::<CounselorApplication>(admin_session());
    board.refresh().await;

    board
        .update_filters(|filters| filters.set_category(Some("Family Therapy")))
        .await;

    assert_eq!(requests_of(&board).len(), 1);
    let ids: Vec<RecordId> = board.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![RecordId(5), RecordId(7)]);
}

#[tokio::test]
async fn clearing_filters_reloads_everything() {
    let mut board = demo_board::<CounselorApplication>(admin_session());
    board
        .update_filters(|filters| {
            filters.set_status(Some("rejected"));
            filters.set_category(Some("Family Therapy"));
        })
        .await;
    assert_eq!(board.rows().len(), 1);

    board.update_filters(|filters| filters.clear()).await;
    assert_eq!(board.rows().len(), 5);
    let last = requests_of(&board).pop().expect("refetch sent");
    assert_eq!(last.query_value("status"), None);
}

#[tokio::test]
async fn appointment_rows_show_display_status_and_cancel_only_when_open() {
    let mut board = demo_board::<Appointment>(couple_session());
    board.refresh().await;

    let rows = board.rows();
    let row = |id: u64| {
        rows.iter()
            .find(|row| row.id == RecordId(id))
            .expect("row present")
    };
    assert_eq!(row(31).status, "pending");
    assert_eq!(row(31).actions, vec![ReviewAction::Cancel]);
    assert_eq!(row(32).actions, vec![ReviewAction::Cancel]);
    assert!(row(33).actions.is_empty());
    assert!(row(34).actions.is_empty());
}

#[tokio::test]
async fn appointment_status_filter_accepts_display_labels() {
    let mut board = demo_board::<Appointment>(couple_session());
    board
        .update_filters(|filters| filters.set_status(Some("pending")))
        .await;

    let ids: Vec<RecordId> = board.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![RecordId(31)]);
}

#[tokio::test]
async fn select_opens_detail_for_loaded_records_only() {
    let mut board = demo_board::<CounselorApplication>(admin_session());
    board.refresh().await;

    assert!(board.select(RecordId(7)));
    assert_eq!(
        board.selected().map(|application| application.full_name.as_str()),
        Some("Dana Whitfield")
    );
    assert!(!board.select(RecordId(404)));
    assert_eq!(board.selected().map(|application| application.id), Some(RecordId(7)));
}

#[tokio::test(start_paused = true)]
async fn typing_burst_sends_one_search_request() {
    let mut board = demo_board::<CounselorApplication>(admin_session());
    board.refresh().await;
    let before = requests_of(&board).len();

    let keystrokes = tokio::join!(
        board.settle_search("d"),
        async {
            tokio::time::sleep(Duration::from_millis(80)).await;
            board.settle_search("da").await
        },
        async {
            tokio::time::sleep(Duration::from_millis(160)).await;
            board.settle_search("dan").await
        },
        async {
            tokio::time::sleep(Duration::from_millis(240)).await;
            board.settle_search("dana").await
        },
    );
    let settled: Vec<String> = [keystrokes.0, keystrokes.1, keystrokes.2, keystrokes.3]
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(settled, vec!["dana".to_string()]);

    for term in &settled {
        board.apply_search(term).await;
    }

    let requests = requests_of(&board);
    assert_eq!(requests.len(), before + 1);
    let last = requests.last().expect("search request sent");
    assert_eq!(last.method, Method::Get);
    assert_eq!(last.query_value("search"), Some("dana"));
    assert_eq!(last.query_value("page"), Some("1"));
    assert_eq!(board.list().count(), 1);
}

#[tokio::test(start_paused = true)]
async fn debounce_delay_comes_from_review_config() {
    let config = ReviewConfig {
        search_debounce: Duration::from_millis(50),
        ..ReviewConfig::default()
    };
    let board =
        configured_board::<CounselorApplication>(demo_repository(), admin_session(), &config);

    let (first, second) = tokio::join!(board.settle_search("dana"), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        board.settle_search("luis").await
    });

    assert_eq!(first.as_deref(), Some("dana"));
    assert_eq!(second.as_deref(), Some("luis"));
}
