//! Authoritative + filtered transaction lists, and load ticketing.

use crate::period::Period;
use crate::search::{self, SearchQuery};
use crate::transaction::Transaction;

/// The transactions of the current period plus the view narrowed by search.
///
/// `filtered` is always a subsequence of `authoritative`: every mutation
/// either replaces both or rebuilds `filtered` from `authoritative`.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    authoritative: Vec<Transaction>,
    filtered: Vec<Transaction>,
    query: SearchQuery,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authoritative(&self) -> &[Transaction] {
        &self.authoritative
    }

    pub fn filtered(&self) -> &[Transaction] {
        &self.filtered
    }

    /// Replace the source list. `filtered` resets to the full list and the
    /// current query is then applied to it.
    pub fn replace(&mut self, transactions: Vec<Transaction>) {
        self.filtered = transactions.clone();
        self.authoritative = transactions;
        if !self.query.is_empty() {
            self.refilter();
        }
    }

    /// Rebuild `filtered` for a new query.
    pub fn apply_search(&mut self, query: SearchQuery) {
        self.query = query;
        self.refilter();
    }

    /// Remove a transaction from both lists. Returns false if the id was
    /// not present in either.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = (self.authoritative.len(), self.filtered.len());
        self.authoritative.retain(|t| t.id != id);
        self.filtered.retain(|t| t.id != id);
        before != (self.authoritative.len(), self.filtered.len())
    }

    pub fn has_transactions(&self) -> bool {
        !self.authoritative.is_empty()
    }

    pub fn has_results(&self) -> bool {
        !self.filtered.is_empty()
    }

    fn refilter(&mut self) {
        self.filtered = search::filter(&self.authoritative, &self.query);
    }
}

/// Identifies one issued list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub period: Period,
}

/// Hands out monotonically increasing tickets and answers whether a
/// completion is still the latest one.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    issued: u64,
    latest: Option<LoadTicket>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, period: Period) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket {
            seq: self.issued,
            period,
        };
        self.latest = Some(ticket);
        ticket
    }

    pub fn is_latest(&self, ticket: LoadTicket) -> bool {
        self.latest == Some(ticket)
    }
}
