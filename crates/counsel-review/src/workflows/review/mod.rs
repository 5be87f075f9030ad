//! Review workflow behind the admin, counselor, and couple dashboards.
//!
//! A [`ReviewBoard`] holds one list view: its filters, the current page of
//! records, which rows have an action in flight, and the open detail view.
//! Actions on counselor applications, user accounts, and appointments go
//! through the board so row state is always derived from the latest fetch.

pub mod actions;
pub mod board;
pub mod dashboard;
pub mod debounce;
pub mod domain;
pub mod filters;
pub mod list;
pub mod pagination;
pub mod prompt;
pub mod resource;

#[cfg(test)]
mod tests;

pub use actions::{ActionError, ActionOutcome, PendingAction, ReviewAction};
pub use board::{ReviewBoard, RowView};
pub use dashboard::{fetch_dashboard_stats, DashboardStats};
pub use debounce::SearchDebouncer;
pub use domain::{
    AdminUser, Appointment, AppointmentStatus, Counselor, CounselorApplication, Couple,
    CoupleStatus, DisplayStatus, Partner, RecordId, UserRole, VerificationStatus,
};
pub use filters::{FilterState, ListQuery};
pub use list::{Applied, FetchTicket, ListError, LoadState, RecordList};
pub use pagination::{entry_range, normalize_page, total_pages, Paginated};
pub use prompt::{PresetPrompter, Prompter};
pub use resource::{matches_search, ReviewResource};

/// Board over counselor applications awaiting verification.
pub type ApplicationBoard<T> = ReviewBoard<CounselorApplication, T>;
pub type CounselorBoard<T> = ReviewBoard<Counselor, T>;
pub type CoupleBoard<T> = ReviewBoard<Couple, T>;
pub type UserBoard<T> = ReviewBoard<AdminUser, T>;
pub type AppointmentBoard<T> = ReviewBoard<Appointment, T>;
