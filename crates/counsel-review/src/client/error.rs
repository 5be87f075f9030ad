use serde_json::Value;

use super::transport::TransportError;
use crate::session::{AuthScope, SessionError};

/// Failure of a single authenticated backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("no {} session token is stored; sign in first", .scope.label())]
    MissingAuth { scope: AuthScope },
    #[error("session expired; sign in again")]
    SessionExpired,
    #[error("insufficient privileges for this request")]
    Forbidden,
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("network failure: {0}")]
    Network(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("token store unavailable: {0}")]
    Session(String),
}

impl FetchError {
    /// Maps a non-2xx response onto the error taxonomy.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        match status {
            401 => FetchError::SessionExpired,
            403 => FetchError::Forbidden,
            _ => FetchError::Http {
                status,
                message: error_message(body),
            },
        }
    }

    /// Generic failures may be retried; auth failures need the user to sign in.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Http { .. } | FetchError::Network(_) | FetchError::Decode(_)
        )
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            FetchError::MissingAuth { .. } | FetchError::SessionExpired | FetchError::Forbidden
        )
    }
}

impl From<TransportError> for FetchError {
    fn from(value: TransportError) -> Self {
        FetchError::Network(value.to_string())
    }
}

impl From<SessionError> for FetchError {
    fn from(value: SessionError) -> Self {
        FetchError::Session(value.to_string())
    }
}

const MAX_MESSAGE_LEN: usize = 200;

fn error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "no response body".to_string();
    }
    text.chars().take(MAX_MESSAGE_LEN).collect()
}
