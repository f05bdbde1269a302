//! Free-text search over transaction descriptions.
//!
//! Matching is a case-insensitive substring test: both the query and the
//! description are upper-cased, and the query is trimmed first. A blank
//! query matches everything.

use crate::transaction::Transaction;

/// A normalized search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    normalized: String,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            normalized: raw.trim().to_uppercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn matches(&self, description: &str) -> bool {
        self.is_empty() || description.to_uppercase().contains(&self.normalized)
    }
}

/// Narrow `transactions` to those whose description matches `query`,
/// keeping their relative order.
pub fn filter(transactions: &[Transaction], query: &SearchQuery) -> Vec<Transaction> {
    if query.is_empty() {
        return transactions.to_vec();
    }
    transactions
        .iter()
        .filter(|t| query.matches(&t.description))
        .cloned()
        .collect()
}
