use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiRequest, FetchError, Transport};
use crate::session::AuthScope;

pub const DASHBOARD_STATS_PATH: &str = "/api/admin/dashboard/stats/";

/// Aggregate counts behind the admin dashboard stat cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_couples: u64,
    #[serde(default)]
    pub pending_applications: u64,
    #[serde(default)]
    pub verified_counselors: u64,
    #[serde(default)]
    pub upcoming_appointments: u64,
}

pub async fn fetch_dashboard_stats<T: Transport>(
    client: &ApiClient<T>,
) -> Result<DashboardStats, FetchError> {
    client
        .fetch_json(AuthScope::Admin, ApiRequest::get(DASHBOARD_STATS_PATH))
        .await
}
