use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_backend_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use counsel_review::backend::{demo_repository, AccessPolicy, BackendState};
use counsel_review::config::AppConfig;
use counsel_review::error::AppError;
use counsel_review::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let access = AccessPolicy::new(
        [config.backend.admin_token.clone()],
        [config.backend.couple_token.clone()],
    );
    let backend = BackendState::new(Arc::new(demo_repository()), access);

    let app = with_backend_routes(backend)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "review backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
