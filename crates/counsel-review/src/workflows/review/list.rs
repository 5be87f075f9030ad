use std::fmt;

use tracing::warn;

use super::pagination::Paginated;
use crate::client::FetchError;

/// List failure as rendered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    MissingAuth,
    SessionExpired,
    Forbidden,
    Unavailable { message: String },
}

impl ListError {
    pub fn message(&self) -> String {
        match self {
            ListError::MissingAuth => "You are not signed in. Sign in to continue.".to_string(),
            ListError::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ListError::Forbidden => {
                "You do not have sufficient privileges to view this list.".to_string()
            }
            ListError::Unavailable { message } => format!("Could not load records: {message}"),
        }
    }

    /// Only generic failures offer a Retry action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ListError::Unavailable { .. })
    }

    /// Sign-in and permission failures; the view stops offering actions.
    pub fn is_auth_failure(&self) -> bool {
        !self.is_retryable()
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ListError {}

impl From<&FetchError> for ListError {
    fn from(value: &FetchError) -> Self {
        match value {
            FetchError::MissingAuth { .. } => ListError::MissingAuth,
            FetchError::SessionExpired => ListError::SessionExpired,
            FetchError::Forbidden => ListError::Forbidden,
            other => ListError::Unavailable {
                message: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(ListError),
}

/// Tag handed out when a fetch starts; only the newest tag may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer fetch started after this one; the response was dropped.
    Stale,
}

/// Records currently shown by a list view plus its load state.
#[derive(Debug, Clone)]
pub struct RecordList<T> {
    generation: u64,
    state: LoadState,
    records: Vec<T>,
    count: u64,
    page: u32,
    total_pages: u32,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: LoadState::Idle,
            records: Vec::new(),
            count: 0,
            page: 1,
            total_pages: 0,
        }
    }
}

impl<T> RecordList<T> {
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a fetch result unless a newer fetch has started since `ticket`.
    ///
    /// Success replaces the records wholesale. Failure keeps the previous
    /// records but moves to [`LoadState::Failed`], which takes precedence when
    /// rendering.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<Paginated<T>, FetchError>,
    ) -> Applied {
        if !self.is_current(ticket) {
            warn!(
                generation = ticket.generation,
                latest = self.generation,
                "dropping stale list response"
            );
            return Applied::Stale;
        }

        match result {
            Ok(page) => {
                self.records = page.results;
                self.count = page.count;
                self.page = page.page;
                self.total_pages = page.total_pages;
                self.state = LoadState::Ready;
            }
            Err(err) => {
                self.state = LoadState::Failed(ListError::from(&err));
            }
        }
        Applied::Current
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn error(&self) -> Option<&ListError> {
        match &self.state {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [T] {
        &mut self.records
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }
}
