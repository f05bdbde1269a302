//! New-transaction form state and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::time::midday_utc;
use crate::transaction::{Category, CreateTransaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Shown inline above the form; nothing is submitted.
    #[error("Please fill in all fields correctly!")]
    Incomplete { missing: Vec<&'static str> },
}

/// Values entered so far. Starts as an expense with everything blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionForm {
    pub kind: TransactionType,
    pub description: String,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    pub category_id: String,
}

impl TransactionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switching type clears a category that no longer fits.
    pub fn set_kind(&mut self, kind: TransactionType, categories: &[Category]) {
        self.kind = kind;
        let still_valid = categories_for(kind, categories)
            .iter()
            .any(|c| c.id == self.category_id);
        if !still_valid {
            self.category_id.clear();
        }
    }

    /// Numeric input that fails to parse counts as zero.
    pub fn set_amount_input(&mut self, raw: &str) {
        self.amount = raw.trim().parse().unwrap_or(Decimal::ZERO);
    }

    pub fn validate(&self) -> Result<CreateTransaction, FormError> {
        let mut missing = Vec::new();
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.amount <= Decimal::ZERO {
            missing.push("amount");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.category_id.trim().is_empty() {
            missing.push("category");
        }

        match self.date {
            Some(date) if missing.is_empty() => Ok(CreateTransaction {
                description: self.description.clone(),
                amount: self.amount,
                date: midday_utc(date),
                kind: self.kind,
                category_id: self.category_id.clone(),
            }),
            _ => Err(FormError::Incomplete { missing }),
        }
    }
}

/// Categories selectable for a transaction of `kind`.
pub fn categories_for(kind: TransactionType, categories: &[Category]) -> Vec<&Category> {
    categories.iter().filter(|c| c.kind == kind).collect()
}
