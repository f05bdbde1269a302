//! Transaction and category types as exchanged with the DevBills API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::Period;
use crate::time::to_rfc3339_millis;

/// Direction of a transaction. The amount itself is always a magnitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TransactionType {
    #[default]
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "income")]
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }

    /// Arrow shown next to a row: up for income, down for expense.
    pub fn arrow(&self) -> &'static str {
        match self {
            TransactionType::Expense => "↓",
            TransactionType::Income => "↑",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(format!("unknown transaction type: {other} (expected expense|income)")),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A user-defined category. Only categories of the same type as a
/// transaction may be attached to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Display color, usually a hex string like `#22c55e`.
    pub color: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// A recorded income or expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub description: String,
    /// Non-negative magnitude; see `kind` for direction.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Amount with the direction applied: negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Expense => -self.amount,
            TransactionType::Income => self.amount,
        }
    }
}

/// Query sent with a list request. Month and year always come from a
/// validated [`Period`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub month: u32,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
}

impl TransactionFilter {
    pub fn for_period(period: Period) -> Self {
        Self {
            month: period.month(),
            year: period.year(),
            category_id: None,
            kind: None,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Body of a create request. Built from a validated form.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(serialize_with = "serialize_millis")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: String,
}

fn serialize_millis<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&to_rfc3339_millis(*dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    const SAMPLE: &str = r##"{
        "id": "t-1",
        "userId": "u-1",
        "description": "Mercado",
        "amount": 152.9,
        "date": "2024-03-10T12:00:00.000Z",
        "type": "expense",
        "category": { "id": "c-1", "name": "Food", "color": "#ef4444", "type": "expense" },
        "categoryId": "c-1",
        "createdAt": "2024-03-10T15:01:02.000Z",
        "updatedAt": "2024-03-10T15:01:02.000Z"
    }"##;

    #[test]
    fn test_transaction_deserializes_from_api_json() {
        let t: Transaction = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(t.id, "t-1");
        assert_eq!(t.amount, dec("152.9"));
        assert_eq!(t.kind, TransactionType::Expense);
        assert_eq!(t.category.name, "Food");
        assert_eq!(t.date.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert!(t.is_expense());
        assert_eq!(t.signed_amount(), dec("-152.9"));
    }

    #[test]
    fn test_filter_skips_absent_fields() {
        let period = Period::new(3, 2024).unwrap();
        let json = serde_json::to_value(TransactionFilter::for_period(period)).unwrap();
        assert_eq!(json, serde_json::json!({ "month": 3, "year": 2024 }));

        let json = serde_json::to_value(
            TransactionFilter::for_period(period)
                .with_category("c-9")
                .with_kind(TransactionType::Income),
        )
        .unwrap();
        assert_eq!(json["categoryId"], "c-9");
        assert_eq!(json["type"], "income");
    }

    #[test]
    fn test_create_payload_uses_midday_millis() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let payload = CreateTransaction {
            description: "Salário".into(),
            amount: dec("3500"),
            date: crate::time::midday_utc(date),
            kind: TransactionType::Income,
            category_id: "c-2".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["date"], "2024-03-10T12:00:00.000Z");
        assert_eq!(json["type"], "income");
        assert_eq!(json["categoryId"], "c-2");
        assert_eq!(json["amount"], 3500.0);
    }

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert!("transfer".parse::<TransactionType>().is_err());
    }
}
