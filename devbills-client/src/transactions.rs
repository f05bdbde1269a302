//! The transactions view: period-synchronized list, debounced search and
//! row deletion.
//!
//! State lives behind a `std::sync::Mutex` that is only held between
//! awaits, never across one. Every async operation locks, mutates and
//! unlocks, so completions interleave the same way UI callbacks would.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use devbills_core::{
    InFlight, ListState, LoadTracker, Period, SearchQuery, Transaction, TransactionFilter,
    TransactionType,
};

use crate::debounce::Debouncer;
use crate::gateway::Gateway;
use crate::lock;
use crate::notify::Notifier;

pub const LOAD_ERROR: &str = "Could not load transactions. Please try again.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this transaction?";
pub const DELETE_OK: &str = "Transaction deleted successfully!";
pub const DELETE_FAILED: &str = "Could not delete transaction. Please try again!";

/// Default quiet period before a search is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user said no; nothing changed.
    Declined,
    /// A delete for this id is already running.
    AlreadyInFlight,
    Deleted,
    Failed(String),
}

/// Read-only copy of the view state for rendering.
#[derive(Debug, Clone)]
pub struct TransactionsView {
    pub period: Period,
    pub loading: bool,
    pub error: Option<String>,
    pub search_text: String,
    pub authoritative: Vec<Transaction>,
    pub filtered: Vec<Transaction>,
    pub deleting: Vec<String>,
    /// The search text `filtered` was last built from. Lags `search_text`
    /// while a debounced search is pending.
    pub applied_search: String,
}

impl TransactionsView {
    pub fn has_transactions(&self) -> bool {
        !self.authoritative.is_empty()
    }

    pub fn has_results(&self) -> bool {
        !self.filtered.is_empty()
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.iter().any(|d| d == id)
    }
}

#[derive(Debug)]
struct State {
    period: Period,
    category_id: Option<String>,
    kind: Option<TransactionType>,
    list: ListState,
    tracker: LoadTracker,
    loading: bool,
    error: Option<String>,
    search_text: String,
    applied_search: String,
    deleting: InFlight,
}

impl State {
    fn apply_current_search(&mut self) {
        let query = SearchQuery::new(&self.search_text);
        self.list.apply_search(query);
        self.applied_search = self.search_text.clone();
    }
}

#[derive(Clone)]
pub struct TransactionsController {
    gateway: Arc<dyn Gateway>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<State>>,
    debouncer: Arc<Debouncer>,
}

impl TransactionsController {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Arc<dyn Notifier>, period: Period) -> Self {
        Self::with_debounce(gateway, notifier, period, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(
        gateway: Arc<dyn Gateway>,
        notifier: Arc<dyn Notifier>,
        period: Period,
        debounce: Duration,
    ) -> Self {
        Self {
            gateway,
            notifier,
            state: Arc::new(Mutex::new(State {
                period,
                category_id: None,
                kind: None,
                list: ListState::new(),
                tracker: LoadTracker::new(),
                loading: false,
                error: None,
                search_text: String::new(),
                applied_search: String::new(),
                deleting: InFlight::new(),
            })),
            debouncer: Arc::new(Debouncer::new(debounce)),
        }
    }

    /// Narrow server-side by category and/or type on every subsequent load.
    pub fn set_server_filter(&self, category_id: Option<String>, kind: Option<TransactionType>) {
        let mut s = lock(&self.state);
        s.category_id = category_id;
        s.kind = kind;
    }

    pub fn snapshot(&self) -> TransactionsView {
        let s = lock(&self.state);
        TransactionsView {
            period: s.period,
            loading: s.loading,
            error: s.error.clone(),
            search_text: s.search_text.clone(),
            authoritative: s.list.authoritative().to_vec(),
            filtered: s.list.filtered().to_vec(),
            deleting: s.deleting.ids(),
            applied_search: s.applied_search.clone(),
        }
    }

    pub fn period(&self) -> Period {
        lock(&self.state).period
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        lock(&self.state).deleting.contains(id)
    }

    /// Initial load when the view is first shown.
    pub async fn open(&self) {
        self.reload().await;
    }

    pub async fn set_period(&self, period: Period) {
        lock(&self.state).period = period;
        self.reload().await;
    }

    /// Step forward one month. At the last representable year the period
    /// stays put and nothing is fetched.
    pub async fn next_month(&self) {
        match self.period().next() {
            Ok(next) => self.set_period(next).await,
            Err(e) => tracing::warn!(error = %e, "cannot move past the last period"),
        }
    }

    pub async fn prev_month(&self) {
        match self.period().prev() {
            Ok(prev) => self.set_period(prev).await,
            Err(e) => tracing::warn!(error = %e, "cannot move before the first period"),
        }
    }

    /// Fetch the list for the current period. Also the manual retry.
    ///
    /// Only the most recently issued load may apply its result; earlier
    /// ones that finish late are dropped.
    pub async fn reload(&self) {
        let (ticket, filter) = {
            let mut s = lock(&self.state);
            let period = s.period;
            let ticket = s.tracker.issue(period);
            s.loading = true;
            s.error = None;
            let mut filter = TransactionFilter::for_period(ticket.period);
            filter.category_id = s.category_id.clone();
            filter.kind = s.kind;
            (ticket, filter)
        };

        let result = self.gateway.list_transactions(&filter).await;

        let mut s = lock(&self.state);
        if !s.tracker.is_latest(ticket) {
            tracing::debug!(seq = ticket.seq, period = %ticket.period, "discarding stale list response");
            return;
        }
        s.loading = false;
        match result {
            Ok(transactions) => {
                tracing::debug!(period = %ticket.period, count = transactions.len(), "transactions loaded");
                s.list.replace(transactions);
                s.apply_current_search();
            }
            Err(e) => {
                tracing::error!(period = %ticket.period, error = %e, "failed to load transactions");
                s.error = Some(LOAD_ERROR.to_string());
            }
        }
    }

    /// Record a keystroke; the filter is rebuilt once typing pauses.
    pub fn on_search_input(&self, text: &str) {
        lock(&self.state).search_text = text.to_string();
        let state = self.state.clone();
        self.debouncer.schedule(move || {
            lock(&state).apply_current_search();
        });
    }

    /// Apply `text` immediately, dropping any pending debounced run.
    pub fn search_now(&self, text: &str) {
        self.debouncer.cancel();
        let mut s = lock(&self.state);
        s.search_text = text.to_string();
        s.apply_current_search();
    }

    pub fn clear_search(&self) {
        self.search_now("");
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Confirm, delete remotely, then drop the row locally.
    pub async fn delete(&self, id: &str, confirm: impl Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Declined;
        }

        {
            let mut s = lock(&self.state);
            if !s.deleting.begin(id) {
                return DeleteOutcome::AlreadyInFlight;
            }
        }

        let result = self.gateway.delete_transaction(id).await;

        let outcome = {
            let mut s = lock(&self.state);
            let outcome = match result {
                Ok(()) => {
                    s.list.remove(id);
                    DeleteOutcome::Deleted
                }
                Err(e) => {
                    tracing::error!(id, error = %e, "failed to delete transaction");
                    DeleteOutcome::Failed(e.to_string())
                }
            };
            s.deleting.finish(id);
            outcome
        };

        match &outcome {
            DeleteOutcome::Deleted => self.notifier.success(DELETE_OK),
            _ => self.notifier.error(DELETE_FAILED),
        }
        outcome
    }
}
