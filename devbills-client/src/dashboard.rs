//! Dashboard data: month summary and the income/expense history.

use std::sync::{Arc, Mutex};

use devbills_core::{LoadTracker, MonthlyItem, Period, TransactionSummary};

use crate::gateway::Gateway;
use crate::lock;

/// Months of history shown next to the summary.
pub const DEFAULT_HISTORY_MONTHS: u32 = 4;

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub period: Period,
    pub summary: TransactionSummary,
    pub history: Vec<MonthlyItem>,
    pub summary_loading: bool,
    pub history_loading: bool,
}

#[derive(Debug)]
struct State {
    view: DashboardView,
    tracker: LoadTracker,
}

#[derive(Clone)]
pub struct DashboardController {
    gateway: Arc<dyn Gateway>,
    months: u32,
    state: Arc<Mutex<State>>,
}

impl DashboardController {
    pub fn new(gateway: Arc<dyn Gateway>, period: Period, months: u32) -> Self {
        Self {
            gateway,
            months,
            state: Arc::new(Mutex::new(State {
                view: DashboardView {
                    period,
                    summary: TransactionSummary::empty(),
                    history: Vec::new(),
                    summary_loading: true,
                    history_loading: true,
                },
                tracker: LoadTracker::new(),
            })),
        }
    }

    pub fn snapshot(&self) -> DashboardView {
        lock(&self.state).view.clone()
    }

    /// Load summary and history for `period` concurrently.
    ///
    /// Each half is applied as soon as it arrives, so a slow history does not
    /// hold the summary in its loading state. A failed summary keeps the
    /// previous one; a failed history shows as empty. Neither is surfaced
    /// beyond the log.
    pub async fn load(&self, period: Period) {
        let ticket = {
            let mut s = lock(&self.state);
            s.view.period = period;
            s.view.summary_loading = true;
            s.view.history_loading = true;
            s.tracker.issue(period)
        };

        let summary = async {
            let result = self.gateway.get_summary(period).await;
            let mut s = lock(&self.state);
            if !s.tracker.is_latest(ticket) {
                tracing::debug!(period = %period, "discarding stale summary");
                return;
            }
            s.view.summary_loading = false;
            match result {
                Ok(summary) => s.view.summary = summary,
                Err(e) => tracing::error!(period = %period, error = %e, "failed to load summary"),
            }
        };

        let history = async {
            let result = self.gateway.get_monthly_history(period, self.months).await;
            let mut s = lock(&self.state);
            if !s.tracker.is_latest(ticket) {
                tracing::debug!(period = %period, "discarding stale history");
                return;
            }
            s.view.history_loading = false;
            match result {
                Ok(history) => s.view.history = history,
                Err(e) => {
                    tracing::error!(period = %period, error = %e, "failed to load transaction history");
                    s.view.history = Vec::new();
                }
            }
        };

        tokio::join!(summary, history);
    }
}
