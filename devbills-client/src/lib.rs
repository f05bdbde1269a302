//! devbills-client: Remote Data Gateway and the async controllers behind
//! the DevBills views

pub mod create;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod http;
pub mod notify;
pub mod session;
pub mod transactions;

pub use create::{CreateFlow, SubmitOutcome};
pub use dashboard::{DashboardController, DashboardView};
pub use debounce::Debouncer;
pub use error::{GatewayError, SessionError};
pub use gateway::Gateway;
pub use http::HttpGateway;
pub use notify::{Level, Notification, NotificationLog, Notifier};
pub use session::{Session, SessionState, SessionUser};
pub use transactions::{Confirm, DeleteOutcome, TransactionsController, TransactionsView};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock, recovering the data if a panicking holder poisoned the mutex.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
