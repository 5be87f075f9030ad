use crate::commands::{render_rows, render_stats};
use clap::Args;
use counsel_review::backend::{admin_router, demo_repository, AccessPolicy, BackendState};
use counsel_review::client::{ApiClient, RecordingTransport, RouterTransport};
use counsel_review::config::AppConfig;
use counsel_review::error::AppError;
use counsel_review::session::{AuthScope, Session};
use counsel_review::telemetry::{self, LogSink};
use counsel_review::workflows::review::{
    fetch_dashboard_stats, ActionOutcome, AdminUser, Appointment, CounselorApplication,
    PresetPrompter, RecordId, ReviewAction, ReviewBoard,
};
use std::sync::Arc;

const DEMO_ADMIN_TOKEN: &str = "demo-admin";
const DEMO_COUPLE_TOKEN: &str = "demo-couple";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Reason recorded when the demo rejects an application
    #[arg(long, default_value = "License number could not be verified")]
    pub(crate) reject_reason: String,
    /// Stop after listing, without approving, rejecting, or cancelling anything
    #[arg(long)]
    pub(crate) read_only: bool,
}

type DemoTransport = RecordingTransport<RouterTransport>;

fn demo_client() -> Arc<ApiClient<DemoTransport>> {
    let access = AccessPolicy::new(
        [DEMO_ADMIN_TOKEN.to_string()],
        [DEMO_COUPLE_TOKEN.to_string()],
    );
    let router = admin_router(BackendState::new(Arc::new(demo_repository()), access));
    let session = Session::in_memory(&[
        (AuthScope::Admin, DEMO_ADMIN_TOKEN),
        (AuthScope::Couple, DEMO_COUPLE_TOKEN),
    ]);
    Arc::new(ApiClient::new(
        RecordingTransport::new(RouterTransport::new(router)),
        session,
    ))
}

fn report(step: &str, outcome: Result<ActionOutcome, AppError>) {
    match outcome {
        Ok(ActionOutcome::Completed { id, action }) => println!("- {step}: {action} #{id} accepted"),
        Ok(ActionOutcome::Dismissed) => println!("- {step}: dismissed, nothing sent"),
        Err(err) => println!("- {step}: {err}"),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        reject_reason,
        read_only,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;
    let client = demo_client();

    println!("Counselor review demo (in-process backend)");
    let mut applications =
        ReviewBoard::<CounselorApplication, _>::new(client.clone(), &config.review);
    applications
        .update_filters(|filters| filters.set_status(Some("pending")))
        .await;
    render_rows("Pending applications", &applications);

    let mut users = ReviewBoard::<AdminUser, _>::new(client.clone(), &config.review);
    users.refresh().await;
    println!();
    render_rows("Users", &users);

    let mut appointments = ReviewBoard::<Appointment, _>::new(client.clone(), &config.review);
    appointments.refresh().await;
    println!();
    render_rows("Appointments", &appointments);

    if read_only {
        return Ok(());
    }

    println!("\nActions");
    let silent = PresetPrompter::default();
    report(
        "Approve application",
        applications
            .perform(RecordId(7), ReviewAction::Approve, &silent)
            .await
            .map_err(AppError::from),
    );

    let with_reason = PresetPrompter::accepting(reject_reason);
    report(
        "Reject application",
        applications
            .perform(RecordId(8), ReviewAction::Reject, &with_reason)
            .await
            .map_err(AppError::from),
    );

    let dismissing = PresetPrompter::accepting("   ");
    report(
        "Reject with blank reason",
        applications
            .perform(RecordId(9), ReviewAction::Reject, &dismissing)
            .await
            .map_err(AppError::from),
    );

    report(
        "Deactivate user",
        users
            .perform(RecordId(21), ReviewAction::Deactivate, &silent)
            .await
            .map_err(AppError::from),
    );

    let confirming = PresetPrompter::accepting("");
    report(
        "Cancel appointment",
        appointments
            .perform(RecordId(31), ReviewAction::Cancel, &confirming)
            .await
            .map_err(AppError::from),
    );
    report(
        "Cancel completed appointment",
        appointments
            .perform(RecordId(33), ReviewAction::Cancel, &confirming)
            .await
            .map_err(AppError::from),
    );

    println!();
    render_rows("Pending applications", &applications);

    println!();
    let stats = fetch_dashboard_stats(&*client).await?;
    render_stats(&stats);

    println!(
        "\n{} requests sent to the backend",
        client.transport().request_count()
    );
    Ok(())
}
