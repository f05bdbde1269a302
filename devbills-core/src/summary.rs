//! Aggregates computed by the API for the dashboard.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category_id: String,
    pub category_name: String,
    pub category_color: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_incomes: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(default)]
    pub expenses_by_category: Vec<CategorySummary>,
}

impl TransactionSummary {
    pub fn empty() -> Self {
        Self {
            total_expenses: Decimal::ZERO,
            total_incomes: Decimal::ZERO,
            balance: Decimal::ZERO,
            expenses_by_category: Vec::new(),
        }
    }
}

impl Default for TransactionSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// One bar of the income-vs-expense history chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
}

/// Pie labels for the expenses-by-category breakdown, e.g. `"Food: 42.5%"`.
///
/// Shares are computed from the amounts themselves so they always sum to
/// ~100 regardless of what the API put in `percentage`.
pub fn category_shares(summary: &TransactionSummary) -> Vec<String> {
    let total: Decimal = summary.expenses_by_category.iter().map(|c| c.amount).sum();
    summary
        .expenses_by_category
        .iter()
        .map(|c| {
            if total.is_zero() {
                return format!("{}: 0%", c.category_name);
            }
            let pct = (c.amount / total * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            format!("{}: {:.1}%", c.category_name, pct)
        })
        .collect()
}
