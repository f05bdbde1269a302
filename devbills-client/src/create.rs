//! New-transaction submission.

use std::sync::Arc;

use devbills_core::{Category, FormError, Transaction, TransactionForm};

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::notify::Notifier;

pub const SAVE_OK: &str = "Transaction saved successfully!";
pub const SAVE_FAILED: &str = "Could not save the transaction. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid(FormError),
    /// Created; the caller should return to the transactions list.
    Saved(Transaction),
    /// The API refused or was unreachable. The form is untouched.
    Failed(String),
}

#[derive(Clone)]
pub struct CreateFlow {
    gateway: Arc<dyn Gateway>,
    notifier: Arc<dyn Notifier>,
}

impl CreateFlow {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self { gateway, notifier }
    }

    /// Categories for the picker; narrow with `categories_for`.
    pub async fn load_categories(&self) -> Result<Vec<Category>, GatewayError> {
        let categories = self.gateway.list_categories().await?;
        tracing::debug!(count = categories.len(), "categories loaded");
        Ok(categories)
    }

    pub async fn submit(&self, form: &TransactionForm) -> SubmitOutcome {
        let payload = match form.validate() {
            Ok(p) => p,
            Err(e) => return SubmitOutcome::Invalid(e),
        };

        match self.gateway.create_transaction(&payload).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "transaction created");
                self.notifier.success(SAVE_OK);
                SubmitOutcome::Saved(created)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save transaction");
                self.notifier.error(SAVE_FAILED);
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}
