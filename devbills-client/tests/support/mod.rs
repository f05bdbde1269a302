//! In-memory gateway with per-call delays and scripted failures.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use devbills_client::{Gateway, GatewayError};
use devbills_core::{
    Category, CreateTransaction, MonthlyItem, Period, Transaction, TransactionFilter,
    TransactionSummary, TransactionType,
};

pub fn txn(id: &str, description: &str) -> Transaction {
    let at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    Transaction {
        id: id.to_string(),
        user_id: "u-1".to_string(),
        description: description.to_string(),
        amount: "25.50".parse().unwrap(),
        date: at,
        kind: TransactionType::Expense,
        category: category("c-food", "Food", TransactionType::Expense),
        category_id: "c-food".to_string(),
        created_at: at,
        updated_at: at,
    }
}

pub fn category(id: &str, name: &str, kind: TransactionType) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        color: "#22c55e".to_string(),
        kind,
    }
}

pub fn period(month: u32, year: i32) -> Period {
    Period::new(month, year).unwrap()
}

pub fn ids(list: &[Transaction]) -> Vec<&str> {
    list.iter().map(|t| t.id.as_str()).collect()
}

fn failure(what: &str) -> GatewayError {
    GatewayError::Status {
        method: "GET",
        path: what.to_string(),
        status: 500,
        body: "boom".to_string(),
    }
}

#[derive(Default)]
pub struct FakeGateway {
    lists: Mutex<HashMap<(u32, i32), Vec<Transaction>>>,
    list_delays: Mutex<HashMap<(u32, i32), Duration>>,
    failing_periods: Mutex<HashSet<(u32, i32)>>,
    failing_deletes: Mutex<HashSet<String>>,
    delete_delay: Mutex<Duration>,
    history_delay: Mutex<Duration>,
    fail_create: Mutex<bool>,
    fail_summary: Mutex<bool>,
    fail_history: Mutex<bool>,
    summary: Mutex<TransactionSummary>,
    history: Mutex<Vec<MonthlyItem>>,
    categories: Mutex<Vec<Category>>,

    pub list_calls: Mutex<Vec<TransactionFilter>>,
    pub delete_calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<CreateTransaction>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, p: Period, list: Vec<Transaction>) -> Self {
        self.lists.lock().unwrap().insert((p.month(), p.year()), list);
        self
    }

    pub fn with_list_delay(self, p: Period, delay: Duration) -> Self {
        self.list_delays
            .lock()
            .unwrap()
            .insert((p.month(), p.year()), delay);
        self
    }

    pub fn with_delete_delay(self, delay: Duration) -> Self {
        *self.delete_delay.lock().unwrap() = delay;
        self
    }

    pub fn with_history_delay(self, delay: Duration) -> Self {
        *self.history_delay.lock().unwrap() = delay;
        self
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        *self.categories.lock().unwrap() = categories;
        self
    }

    pub fn with_summary(self, summary: TransactionSummary) -> Self {
        *self.summary.lock().unwrap() = summary;
        self
    }

    pub fn with_history(self, history: Vec<MonthlyItem>) -> Self {
        *self.history.lock().unwrap() = history;
        self
    }

    pub fn fail_period(&self, p: Period, fail: bool) {
        let mut set = self.failing_periods.lock().unwrap();
        if fail {
            set.insert((p.month(), p.year()));
        } else {
            set.remove(&(p.month(), p.year()));
        }
    }

    pub fn fail_delete(&self, id: &str) {
        self.failing_deletes.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_create(&self, fail: bool) {
        *self.fail_create.lock().unwrap() = fail;
    }

    pub fn fail_summary(&self, fail: bool) {
        *self.fail_summary.lock().unwrap() = fail;
    }

    pub fn fail_history(&self, fail: bool) {
        *self.fail_history.lock().unwrap() = fail;
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, GatewayError> {
        self.list_calls.lock().unwrap().push(filter.clone());
        let key = (filter.month, filter.year);
        let delay = self.list_delays.lock().unwrap().get(&key).copied();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if self.failing_periods.lock().unwrap().contains(&key) {
            return Err(failure("/transactions"));
        }
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_summary(&self, _period: Period) -> Result<TransactionSummary, GatewayError> {
        if *self.fail_summary.lock().unwrap() {
            return Err(failure("/transactions/summary"));
        }
        Ok(self.summary.lock().unwrap().clone())
    }

    async fn get_monthly_history(
        &self,
        _period: Period,
        months: u32,
    ) -> Result<Vec<MonthlyItem>, GatewayError> {
        let delay = *self.history_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_history.lock().unwrap() {
            return Err(failure("/transactions/historical"));
        }
        let history = self.history.lock().unwrap().clone();
        Ok(history.into_iter().take(months as usize).collect())
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), GatewayError> {
        self.delete_calls.lock().unwrap().push(id.to_string());
        let delay = *self.delete_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing_deletes.lock().unwrap().contains(id) {
            return Err(failure("/transactions/:id"));
        }
        Ok(())
    }

    async fn create_transaction(
        &self,
        payload: &CreateTransaction,
    ) -> Result<Transaction, GatewayError> {
        if *self.fail_create.lock().unwrap() {
            return Err(failure("/transactions"));
        }
        self.created.lock().unwrap().push(payload.clone());
        let mut t = txn("new-1", &payload.description);
        t.amount = payload.amount;
        t.date = payload.date;
        t.kind = payload.kind;
        t.category_id = payload.category_id.clone();
        Ok(t)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError> {
        Ok(self.categories.lock().unwrap().clone())
    }
}
