//! devbills-core: domain types and the pure state behind the DevBills views

pub mod form;
pub mod format;
pub mod in_flight;
pub mod list_state;
pub mod period;
pub mod search;
pub mod summary;
pub mod time;
pub mod transaction;

pub use form::{FormError, TransactionForm, categories_for};
pub use format::{format_currency, format_date};
pub use in_flight::InFlight;
pub use list_state::{ListState, LoadTicket, LoadTracker};
pub use period::{Period, PeriodError, selectable_years};
pub use search::SearchQuery;
pub use summary::{CategorySummary, MonthlyItem, TransactionSummary, category_shares};
pub use transaction::{Category, CreateTransaction, Transaction, TransactionFilter, TransactionType};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::transaction::{Category, Transaction, TransactionType};
    use chrono::{TimeZone, Utc};

    /// Minimal expense with the given id and description.
    pub fn txn(id: &str, description: &str) -> Transaction {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        Transaction {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            description: description.to_string(),
            amount: "10".parse().unwrap(),
            date: at,
            kind: TransactionType::Expense,
            category: Category {
                id: "c-1".to_string(),
                name: "General".to_string(),
                color: "#64748b".to_string(),
                kind: TransactionType::Expense,
            },
            category_id: "c-1".to_string(),
            created_at: at,
            updated_at: at,
        }
    }
}
