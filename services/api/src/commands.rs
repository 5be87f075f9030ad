use crate::infra::{command_config, file_session, http_client, StdinPrompter};
use clap::Args;
use counsel_review::client::{ApiClient, HttpTransport, Transport};
use counsel_review::config::AppConfig;
use counsel_review::error::AppError;
use counsel_review::session::AuthScope;
use counsel_review::workflows::review::{
    entry_range, fetch_dashboard_stats, ActionError, ActionOutcome, AdminUser, Appointment,
    Counselor, CounselorApplication, Couple, DashboardStats, LoadState, PresetPrompter, Prompter, RecordId,
    ReviewAction, ReviewBoard, ReviewResource, UserRole,
};
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Page to show, starting at 1
    #[arg(long)]
    pub(crate) page: Option<u32>,
    /// Rows per page (defaults to REVIEW_PAGE_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<u32>,
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Case-insensitive match on names and emails
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Narrows the fetched page locally, e.g. by specialization
    #[arg(long)]
    pub(crate) category: Option<String>,
}

/// One-line rendering of a record for list output.
pub(crate) trait Summary {
    fn summary(&self) -> String;
}

impl Summary for CounselorApplication {
    fn summary(&self) -> String {
        format!(
            "{} <{}> {}",
            self.full_name,
            self.email,
            self.specialization.as_deref().unwrap_or("-")
        )
    }
}

impl Summary for Counselor {
    fn summary(&self) -> String {
        format!(
            "{} <{}> {}, {} active couples",
            self.full_name,
            self.email,
            self.specialization.as_deref().unwrap_or("-"),
            self.active_couples
        )
    }
}

impl Summary for Couple {
    fn summary(&self) -> String {
        format!(
            "{} ({}% of assessments)",
            self.display_name(),
            self.progress_percent()
        )
    }
}

fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Couple => "couple",
        UserRole::Counselor => "counselor",
        UserRole::Admin => "admin",
    }
}

impl Summary for AdminUser {
    fn summary(&self) -> String {
        format!("{} <{}> {}", self.full_name, self.email, role_label(self.role))
    }
}

impl Summary for Appointment {
    fn summary(&self) -> String {
        format!(
            "{} with {} at {}",
            self.couple_name,
            self.counselor_name,
            self.scheduled_at.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

type HttpBoard<R> = ReviewBoard<R, HttpTransport>;

fn board<R: ReviewResource>(
    client: Arc<ApiClient<HttpTransport>>,
    config: &AppConfig,
) -> HttpBoard<R> {
    ReviewBoard::new(client, &config.review)
}

fn ensure_ready(state: &LoadState) -> Result<(), AppError> {
    match state {
        LoadState::Failed(err) => Err(err.clone().into()),
        _ => Ok(()),
    }
}

pub(crate) fn render_rows<R, T>(title: &str, board: &ReviewBoard<R, T>)
where
    R: ReviewResource + Summary,
    T: Transport,
{
    let list = board.list();
    let limit = board.filters().query().limit;
    let shown = match entry_range(list.page(), limit, list.count()) {
        Some(range) => format!("showing {}-{}", range.start(), range.end()),
        None => "nothing to show".to_string(),
    };
    println!(
        "{title}: page {} of {}, {} total, {shown}",
        list.page(),
        list.total_pages().max(1),
        list.count()
    );

    for row in board.rows() {
        let summary = board
            .record(row.id)
            .map(Summary::summary)
            .unwrap_or_default();
        let actions = if row.actions.is_empty() {
            String::new()
        } else {
            let labels: Vec<&str> = row.actions.iter().map(|action| action.label()).collect();
            format!("  [{}]", labels.join(", "))
        };
        println!("  #{:<5} {:<10} {summary}{actions}", row.id.0, row.status);
    }
}

async fn list<R>(title: &str, args: ListArgs) -> Result<(), AppError>
where
    R: ReviewResource + Summary,
{
    let config = command_config()?;
    let mut board = board::<R>(http_client(&config)?, &config);
    let state = board
        .update_filters(|filters| {
            if let Some(limit) = args.limit {
                filters.set_limit(limit);
            }
            filters.set_status(args.status.as_deref());
            filters.set_search(args.search.as_deref());
            filters.set_category(args.category.as_deref());
            if let Some(page) = args.page {
                filters.set_page(page);
            }
        })
        .await;
    ensure_ready(state)?;
    render_rows(title, &board);
    Ok(())
}

/// Walks pages until `id` is loaded so an action can be offered on it.
pub(crate) async fn locate<R, T>(board: &mut ReviewBoard<R, T>, id: RecordId) -> Result<(), AppError>
where
    R: ReviewResource,
    T: Transport,
{
    ensure_ready(board.refresh().await)?;
    while board.record(id).is_none() {
        let next = board.list().page() + 1;
        if next > board.list().total_pages() {
            return Err(ActionError::UnknownRecord(id).into());
        }
        ensure_ready(board.go_to_page(next).await)?;
    }
    Ok(())
}

async fn act<R>(id: u64, action: ReviewAction, prompter: &dyn Prompter) -> Result<(), AppError>
where
    R: ReviewResource,
{
    let config = command_config()?;
    let mut board = board::<R>(http_client(&config)?, &config);
    let id = RecordId(id);
    locate(&mut board, id).await?;

    match board.perform(id, action, prompter).await? {
        ActionOutcome::Completed { id, action } => println!("{action} #{id}: done"),
        ActionOutcome::Dismissed => println!("{action} #{id}: dismissed, nothing sent"),
    }
    Ok(())
}

pub(crate) async fn list_applications(args: ListArgs) -> Result<(), AppError> {
    list::<CounselorApplication>("Counselor applications", args).await
}

pub(crate) async fn list_counselors(args: ListArgs) -> Result<(), AppError> {
    list::<Counselor>("Counselors", args).await
}

pub(crate) async fn list_users(args: ListArgs) -> Result<(), AppError> {
    list::<AdminUser>("Users", args).await
}

pub(crate) async fn list_couples(args: ListArgs) -> Result<(), AppError> {
    list::<Couple>("Couples", args).await
}

pub(crate) async fn list_appointments(args: ListArgs) -> Result<(), AppError> {
    list::<Appointment>("Appointments", args).await
}

pub(crate) async fn approve_application(id: u64) -> Result<(), AppError> {
    act::<CounselorApplication>(id, ReviewAction::Approve, &StdinPrompter).await
}

pub(crate) async fn reject_application(id: u64, reason: Option<String>) -> Result<(), AppError> {
    match reason {
        Some(reason) => {
            let prompter = PresetPrompter::accepting(reason);
            act::<CounselorApplication>(id, ReviewAction::Reject, &prompter).await
        }
        None => act::<CounselorApplication>(id, ReviewAction::Reject, &StdinPrompter).await,
    }
}

pub(crate) async fn set_user_active(id: u64, active: bool) -> Result<(), AppError> {
    let action = if active {
        ReviewAction::Activate
    } else {
        ReviewAction::Deactivate
    };
    act::<AdminUser>(id, action, &StdinPrompter).await
}

pub(crate) async fn cancel_appointment(id: u64, skip_confirm: bool) -> Result<(), AppError> {
    if skip_confirm {
        act::<Appointment>(id, ReviewAction::Cancel, &PresetPrompter::accepting("")).await
    } else {
        act::<Appointment>(id, ReviewAction::Cancel, &StdinPrompter).await
    }
}

pub(crate) fn render_stats(stats: &DashboardStats) {
    println!("Dashboard");
    println!("  Total users:            {}", stats.total_users);
    println!("  Active couples:         {}", stats.active_couples);
    println!("  Pending applications:   {}", stats.pending_applications);
    println!("  Verified counselors:    {}", stats.verified_counselors);
    println!("  Upcoming appointments:  {}", stats.upcoming_appointments);
}

pub(crate) async fn show_stats() -> Result<(), AppError> {
    let config = command_config()?;
    let client = http_client(&config)?;
    let stats = fetch_dashboard_stats(&*client).await?;
    render_stats(&stats);
    Ok(())
}

pub(crate) fn set_token(scope: AuthScope, token: &str) -> Result<(), AppError> {
    let config = command_config()?;
    if token.trim().is_empty() {
        return Err(AppError::InvalidInput("token must not be blank".to_string()));
    }
    file_session(&config).store_token(scope, token)?;
    info!(scope = scope.label(), path = %config.client.token_store.display(), "token stored");
    println!("Stored {} token", scope.label());
    Ok(())
}

pub(crate) fn clear_token(scope: AuthScope) -> Result<(), AppError> {
    let config = command_config()?;
    file_session(&config).clear(scope)?;
    println!("Cleared {} token", scope.label());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_review::backend::{
        admin_router, AccessPolicy, AdminDataset, BackendState, MemoryAdminRepository,
    };
    use counsel_review::client::{RecordingTransport, RouterTransport};
    use counsel_review::config::ReviewConfig;
    use counsel_review::session::Session;

    const ADMIN: &str = "cli-admin";

    type LocalBoard = ReviewBoard<AdminUser, RecordingTransport<RouterTransport>>;

    fn users_board(count: u64) -> LocalBoard {
        let dataset = AdminDataset {
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
        };
        let access = AccessPolicy::new([ADMIN.to_string()], Vec::new());
        let router = admin_router(BackendState::new(
            Arc::new(MemoryAdminRepository::new(dataset)),
            access,
        ));
        let client = ApiClient::new(
            RecordingTransport::new(RouterTransport::new(router)),
            Session::in_memory(&[(AuthScope::Admin, ADMIN)]),
        );
        ReviewBoard::new(Arc::new(client), &ReviewConfig::default())
    }

    #[tokio::test]
    async fn locate_pages_forward_until_the_record_is_loaded() {
        let mut board = users_board(47);

        locate(&mut board, RecordId(45)).await.expect("found on page 3");

        assert_eq!(board.list().page(), 3);
        assert!(board.record(RecordId(45)).is_some());
        assert_eq!(board.client().transport().request_count(), 3);

        let outcome = board
            .perform(RecordId(45), ReviewAction::Deactivate, &PresetPrompter::default())
            .await
            .expect("deactivate");
        assert_eq!(
            outcome,
            ActionOutcome::Completed {
                id: RecordId(45),
                action: ReviewAction::Deactivate
            }
        );
    }

    #[tokio::test]
    async fn locate_reports_ids_past_the_last_page() {
        let mut board = users_board(47);

        let err = locate(&mut board, RecordId(99)).await.expect_err("absent");

        assert!(matches!(
            err,
            AppError::Action(ActionError::UnknownRecord(RecordId(99)))
        ));
        assert_eq!(board.list().page(), 3);
    }

    #[tokio::test]
    async fn locate_on_an_empty_collection_reports_unknown_record() {
        let mut board = users_board(0);

        let err = locate(&mut board, RecordId(1)).await.expect_err("empty");

        assert!(matches!(
            err,
            AppError::Action(ActionError::UnknownRecord(RecordId(1)))
        ));
        assert_eq!(board.list().total_pages(), 0);
        assert_eq!(board.client().transport().request_count(), 1);
    }

    #[test]
    fn counselor_summary_shows_caseload() {
        let counselor = Counselor {
            id: RecordId(3),
            full_name: "Priya Raman".to_string(),
            email: "priya@example.com".to_string(),
            specialization: Some("Family Therapy".to_string()),
            status: counsel_review::workflows::review::VerificationStatus::Approved,
            active_couples: 2,
        };
        assert_eq!(
            counselor.summary(),
            "Priya Raman <priya@example.com> Family Therapy, 2 active couples"
        );
    }
}
