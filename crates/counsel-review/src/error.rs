use crate::client::{FetchError, TransportError};
use crate::config::ConfigError;
use crate::session::SessionError;
use crate::telemetry::TelemetryError;
use crate::workflows::review::{ActionError, ListError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Session(SessionError),
    Transport(TransportError),
    Fetch(FetchError),
    List(ListError),
    Action(ActionError),
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Transport(err) => write!(f, "transport error: {}", err),
            AppError::Fetch(err) => write!(f, "request error: {}", err),
            AppError::List(err) => write!(f, "{}", err),
            AppError::Action(err) => write!(f, "action error: {}", err),
            AppError::InvalidInput(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Transport(err) => Some(err),
            AppError::Fetch(err) => Some(err),
            AppError::List(err) => Some(err),
            AppError::Action(err) => Some(err),
            AppError::InvalidInput(_) => None,
        }
    }
}

fn fetch_status(err: &FetchError) -> StatusCode {
    match err {
        FetchError::MissingAuth { .. } | FetchError::SessionExpired => StatusCode::UNAUTHORIZED,
        FetchError::Forbidden => StatusCode::FORBIDDEN,
        FetchError::Http { .. } | FetchError::Network(_) | FetchError::Decode(_) => {
            StatusCode::BAD_GATEWAY
        }
        FetchError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn list_status(err: &ListError) -> StatusCode {
    match err {
        ListError::MissingAuth | ListError::SessionExpired => StatusCode::UNAUTHORIZED,
        ListError::Forbidden => StatusCode::FORBIDDEN,
        ListError::Unavailable { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Action(ActionError::InFlight(_)) => StatusCode::CONFLICT,
            AppError::Action(ActionError::NotOffered { .. }) => StatusCode::CONFLICT,
            AppError::Action(ActionError::UnknownRecord(_)) => StatusCode::NOT_FOUND,
            AppError::Action(ActionError::Fetch(err)) | AppError::Fetch(err) => fetch_status(err),
            AppError::Action(ActionError::Blocked(err)) | AppError::List(err) => list_status(err),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Session(_)
            | AppError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<TransportError> for AppError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<FetchError> for AppError {
    fn from(value: FetchError) -> Self {
        Self::Fetch(value)
    }
}

impl From<ListError> for AppError {
    fn from(value: ListError) -> Self {
        Self::List(value)
    }
}

impl From<ActionError> for AppError {
    fn from(value: ActionError) -> Self {
        Self::Action(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::review::RecordId;

    #[test]
    fn fetch_failures_map_to_http_statuses() {
        let response = AppError::Fetch(FetchError::SessionExpired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response =
            AppError::Action(ActionError::Fetch(FetchError::Forbidden)).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = AppError::Action(ActionError::InFlight(RecordId(7))).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::Action(ActionError::Blocked(ListError::SessionExpired))
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::InvalidInput("bad id".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
