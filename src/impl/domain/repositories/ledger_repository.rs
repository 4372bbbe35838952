use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{Receipt, ReceiptId};

/// Persisted collection of receipts, together with the monthly budget.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn append(&self, receipt: Receipt) -> Result<(), ServerError>;

    /// Removes one line item and returns the receipt's recomputed total.
    /// Returns `None`, leaving the ledger untouched, if the receipt or the
    /// index does not exist.
    async fn remove_item(
        &self,
        receipt_id: &ReceiptId,
        item_index: usize,
    ) -> Result<Option<f64>, ServerError>;

    async fn delete(&self, receipt_id: &ReceiptId) -> Result<(), ServerError>;

    async fn clear(&self) -> Result<(), ServerError>;

    /// Newest receipt first.
    async fn list_all(&self) -> Result<Vec<Receipt>, ServerError>;

    async fn monthly_budget(&self) -> Result<f64, ServerError>;

    async fn set_monthly_budget(&self, budget: f64) -> Result<(), ServerError>;
}
