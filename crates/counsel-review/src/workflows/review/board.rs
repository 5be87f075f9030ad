use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::actions::{ActionError, ActionOutcome, PendingAction, ReviewAction};
use super::debounce::SearchDebouncer;
use super::domain::RecordId;
use super::filters::{FilterState, ListQuery};
use super::list::{Applied, FetchTicket, ListError, LoadState, RecordList};
use super::pagination::{normalize_page, Paginated};
use super::prompt::Prompter;
use super::resource::ReviewResource;
use crate::client::{ApiClient, ApiRequest, FetchError, Transport};
use crate::config::ReviewConfig;

/// One rendered row: the record's id, status, and the actions it offers right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: RecordId,
    pub status: &'static str,
    pub actions: Vec<ReviewAction>,
    pub busy: bool,
}

/// State and actions of one admin list view.
pub struct ReviewBoard<R, T> {
    client: Arc<ApiClient<T>>,
    filters: FilterState,
    list: RecordList<R>,
    in_flight: BTreeSet<RecordId>,
    selected: Option<RecordId>,
    debouncer: SearchDebouncer,
}

impl<R, T> ReviewBoard<R, T>
where
    R: ReviewResource,
    T: Transport,
{
    pub fn new(client: Arc<ApiClient<T>>, config: &ReviewConfig) -> Self {
        Self {
            client,
            filters: FilterState::new(config.page_limit),
            list: RecordList::default(),
            in_flight: BTreeSet::new(),
            selected: None,
            debouncer: SearchDebouncer::new(config.search_debounce),
        }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn list(&self) -> &RecordList<R> {
        &self.list
    }

    pub fn state(&self) -> &LoadState {
        self.list.state()
    }

    pub fn record(&self, id: RecordId) -> Option<&R> {
        self.list
            .records()
            .iter()
            .find(|record| record.record_id() == id)
    }

    /// Opens the detail view for a record on the current page.
    pub fn select(&mut self, id: RecordId) -> bool {
        let found = self.record(id).is_some();
        if found {
            self.selected = Some(id);
        }
        found
    }

    pub fn selected(&self) -> Option<&R> {
        self.selected.and_then(|id| self.record(id))
    }

    pub fn is_busy(&self, id: RecordId) -> bool {
        self.in_flight.contains(&id)
    }

    /// The sign-in or permission failure that currently blocks actions, if any.
    pub fn auth_failure(&self) -> Option<&ListError> {
        self.list.error().filter(|err| err.is_auth_failure())
    }

    /// Rows for the current page, narrowed by the local category filter.
    ///
    /// Actions are derived from each record as it is now. Busy rows offer
    /// none, and neither does any row while an auth failure is showing.
    pub fn rows(&self) -> Vec<RowView> {
        let blocked = self.auth_failure().is_some();
        self.list
            .records()
            .iter()
            .filter(|record| self.filters.matches_category(record.category()))
            .map(|record| {
                let id = record.record_id();
                let busy = self.is_busy(id);
                RowView {
                    id,
                    status: record.status_label(),
                    actions: if busy || blocked {
                        Vec::new()
                    } else {
                        record.offered_actions()
                    },
                    busy,
                }
            })
            .collect()
    }

    /// Starts a fetch for the current filters; pair with [`apply_fetch`](Self::apply_fetch).
    pub fn begin_fetch(&mut self) -> (FetchTicket, ListQuery) {
        (self.list.begin(), self.filters.query().clone())
    }

    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Paginated<R>, FetchError>,
    ) -> Applied {
        self.list.apply(ticket, result)
    }

    /// Fetches one page without touching board state.
    pub async fn load(&self, query: &ListQuery) -> Result<Paginated<R>, FetchError> {
        let request = ApiRequest::get(R::COLLECTION).with_query(query.pairs());
        let response = self.client.execute(R::SCOPE, request).await?;
        normalize_page(&response.body, query).map_err(|err| FetchError::Decode(err.to_string()))
    }

    pub async fn refresh(&mut self) -> &LoadState {
        let (ticket, query) = self.begin_fetch();
        let result = self.load(&query).await;
        self.apply_fetch(ticket, result);
        self.list.state()
    }

    /// Re-runs the last fetch; only offered after a generic failure.
    pub fn can_retry(&self) -> bool {
        self.list.error().is_some_and(|err| err.is_retryable())
    }

    pub async fn retry(&mut self) -> &LoadState {
        self.refresh().await
    }

    /// Applies `change` to the filters and refetches when the query moved.
    pub async fn update_filters<F>(&mut self, change: F) -> &LoadState
    where
        F: FnOnce(&mut FilterState),
    {
        let before = self.filters.query().clone();
        change(&mut self.filters);
        if before != *self.filters.query() || self.list.state() == &LoadState::Idle {
            self.refresh().await
        } else {
            self.list.state()
        }
    }

    pub async fn go_to_page(&mut self, page: u32) -> &LoadState {
        self.update_filters(|filters| filters.set_page(page)).await
    }

    /// Waits out the search quiet period for one keystroke.
    ///
    /// Takes `&self` so a burst of keystrokes can wait concurrently; only the
    /// last of them yields `Some`. Hand that to [`apply_search`](Self::apply_search).
    pub async fn settle_search(&self, input: &str) -> Option<String> {
        self.debouncer.settle(input.to_string()).await
    }

    /// Applies a settled search term, refetching from page 1 when it changed.
    pub async fn apply_search(&mut self, settled: &str) -> &LoadState {
        self.update_filters(|filters| filters.set_search(Some(settled)))
            .await
    }

    /// Runs the local checks and dialogs for `action` and marks the row busy.
    ///
    /// `Ok(None)` means the user dismissed the dialog and nothing should be sent.
    pub fn begin_action(
        &mut self,
        id: RecordId,
        action: ReviewAction,
        prompter: &dyn Prompter,
    ) -> Result<Option<PendingAction>, ActionError> {
        if let Some(err) = self.auth_failure() {
            return Err(ActionError::Blocked(err.clone()));
        }
        if self.in_flight.contains(&id) {
            return Err(ActionError::InFlight(id));
        }
        let record = self.record(id).ok_or(ActionError::UnknownRecord(id))?;
        if !record.offered_actions().contains(&action) {
            return Err(ActionError::NotOffered { id, action });
        }

        let reason = match action {
            ReviewAction::Reject => {
                let reply = prompter.prompt(&format!("Reason for rejecting #{id}:"));
                match reply.map(|reason| reason.trim().to_string()) {
                    Some(reason) if !reason.is_empty() => Some(reason),
                    _ => return Ok(None),
                }
            }
            ReviewAction::Cancel => {
                if !prompter.confirm(&format!("Cancel appointment #{id}?")) {
                    return Ok(None);
                }
                None
            }
            _ => None,
        };

        self.in_flight.insert(id);
        Ok(Some(PendingAction {
            id,
            action,
            request: action.request(id, reason.as_deref()),
        }))
    }

    /// Settles a pending action with the server's reply.
    ///
    /// Success applies any optimistic change, clears the detail view, and
    /// refetches so the server's state wins. Failure alerts and leaves the
    /// records untouched.
    pub async fn finish_action(
        &mut self,
        pending: PendingAction,
        result: Result<(), FetchError>,
        prompter: &dyn Prompter,
    ) -> Result<ActionOutcome, ActionError> {
        let PendingAction { id, action, .. } = pending;
        self.in_flight.remove(&id);

        if let Err(err) = result {
            warn!(%id, action = action.label(), error = %err, "review action failed");
            prompter.alert(&format!("Could not {action} #{id}: {err}"));
            return Err(ActionError::Fetch(err));
        }

        if let Some(record) = self
            .list
            .records_mut()
            .iter_mut()
            .find(|record| record.record_id() == id)
        {
            record.apply_optimistic(action);
        }
        self.selected = None;
        info!(%id, action = action.label(), "review action accepted");

        self.refresh().await;
        Ok(ActionOutcome::Completed { id, action })
    }

    /// Full action round trip: checks, dialog, single request, refetch.
    pub async fn perform(
        &mut self,
        id: RecordId,
        action: ReviewAction,
        prompter: &dyn Prompter,
    ) -> Result<ActionOutcome, ActionError> {
        let Some(pending) = self.begin_action(id, action, prompter)? else {
            return Ok(ActionOutcome::Dismissed);
        };
        let result = self
            .client
            .command(action.scope(), pending.request.clone())
            .await;
        self.finish_action(pending, result, prompter).await
    }
}
