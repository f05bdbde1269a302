//! The Remote Data Gateway: every call the views make to the DevBills API.

use async_trait::async_trait;
use devbills_core::{
    Category, CreateTransaction, MonthlyItem, Period, Transaction, TransactionFilter,
    TransactionSummary,
};

use crate::error::GatewayError;

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, GatewayError>;

    async fn get_summary(&self, period: Period) -> Result<TransactionSummary, GatewayError>;

    async fn get_monthly_history(
        &self,
        period: Period,
        months: u32,
    ) -> Result<Vec<MonthlyItem>, GatewayError>;

    /// Any non-success response is an error.
    async fn delete_transaction(&self, id: &str) -> Result<(), GatewayError>;

    async fn create_transaction(
        &self,
        payload: &CreateTransaction,
    ) -> Result<Transaction, GatewayError>;

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError>;
}
