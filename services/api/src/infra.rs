use counsel_review::client::{ApiClient, HttpTransport};
use counsel_review::config::AppConfig;
use counsel_review::error::AppError;
use counsel_review::session::{FileTokenStore, Session};
use counsel_review::telemetry::{self, LogSink};
use counsel_review::workflows::review::Prompter;
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::{self, BufRead, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads configuration and logs to stderr so command output stays clean.
pub(crate) fn command_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;
    Ok(config)
}

pub(crate) fn file_session(config: &AppConfig) -> Session {
    Session::new(Arc::new(FileTokenStore::new(
        config.client.token_store.clone(),
    )))
}

pub(crate) fn http_client(config: &AppConfig) -> Result<Arc<ApiClient<HttpTransport>>, AppError> {
    let transport = HttpTransport::from_config(&config.client)?;
    Ok(Arc::new(ApiClient::new(transport, file_session(config))))
}

/// Terminal dialogs for interactive commands.
pub(crate) struct StdinPrompter;

impl StdinPrompter {
    fn read_line(message: &str) -> Option<String> {
        print!("{message} ");
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompter for StdinPrompter {
    fn confirm(&self, message: &str) -> bool {
        Self::read_line(&format!("{message} [y/N]"))
            .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
    }

    fn prompt(&self, message: &str) -> Option<String> {
        Self::read_line(message)
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
