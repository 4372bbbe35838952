use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tracing::{info, warn};

use crate::{
    domain::{
        logic::receipt_builder::ReceiptBuilder,
        repositories::ledger_repository::LedgerRepository,
    },
    entities::{Clock, ManualEntryForm, Receipt, ReceiptId},
};

#[async_trait]
pub trait LedgerUsecase: Send + Sync {
    async fn submit_manual_entry(&self, form: ManualEntryForm) -> Result<Receipt, ServerError>;

    /// Returns the receipt's new total, or `None` if nothing was removed.
    async fn remove_item(
        &self,
        receipt_id: &ReceiptId,
        item_index: usize,
    ) -> Result<Option<f64>, ServerError>;

    async fn delete_receipt(&self, receipt_id: &ReceiptId) -> Result<(), ServerError>;

    async fn clear_receipts(&self) -> Result<(), ServerError>;

    /// Newest first.
    async fn receipts(&self) -> Result<Vec<Receipt>, ServerError>;

    async fn monthly_budget(&self) -> Result<f64, ServerError>;

    async fn set_monthly_budget(&self, budget: f64) -> Result<(), ServerError>;
}

pub(crate) struct LedgerUsecaseImpl {
    ledger: Arc<dyn LedgerRepository>,
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl LedgerUsecase for LedgerUsecaseImpl {
    async fn submit_manual_entry(&self, form: ManualEntryForm) -> Result<Receipt, ServerError> {
        let receipt = ReceiptBuilder::from_manual_entry(form, self.clock.now());
        self.ledger.append(receipt.clone()).await?;
        info!(receipt_id = %receipt.id, total = receipt.total(), "recorded manual entry");
        Ok(receipt)
    }

    async fn remove_item(
        &self,
        receipt_id: &ReceiptId,
        item_index: usize,
    ) -> Result<Option<f64>, ServerError> {
        let total = self.ledger.remove_item(receipt_id, item_index).await?;
        match total {
            Some(total) => info!(receipt_id = %receipt_id, item_index, total, "removed item"),
            None => warn!(receipt_id = %receipt_id, item_index, "no such item; ledger unchanged"),
        }
        Ok(total)
    }

    async fn delete_receipt(&self, receipt_id: &ReceiptId) -> Result<(), ServerError> {
        self.ledger.delete(receipt_id).await?;
        info!(receipt_id = %receipt_id, "deleted receipt");
        Ok(())
    }

    async fn clear_receipts(&self) -> Result<(), ServerError> {
        self.ledger.clear().await?;
        info!("cleared all receipts");
        Ok(())
    }

    async fn receipts(&self) -> Result<Vec<Receipt>, ServerError> {
        self.ledger.list_all().await
    }

    async fn monthly_budget(&self) -> Result<f64, ServerError> {
        self.ledger.monthly_budget().await
    }

    async fn set_monthly_budget(&self, budget: f64) -> Result<(), ServerError> {
        self.ledger.set_monthly_budget(budget).await?;
        info!(budget, "updated monthly budget");
        Ok(())
    }
}

impl LedgerUsecaseImpl {
    pub(crate) fn new(ledger: Arc<dyn LedgerRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;
    use crate::{
        data::repositories::ledger_repository_impl::LedgerRepositoryImpl,
        entities::{Category, FixedClock, ManualEntryItem},
    };

    fn usecase() -> LedgerUsecaseImpl {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 4, 0, 0).unwrap();
        LedgerUsecaseImpl::new(
            Arc::new(LedgerRepositoryImpl::in_memory(20000.0)),
            Arc::new(FixedClock(now)),
        )
    }

    fn bread_and_milk() -> ManualEntryForm {
        let mut form = ManualEntryForm::blank(Utc.with_ymd_and_hms(2025, 3, 14, 4, 0, 0).unwrap());
        form.store_name = "Corner Shop".to_string();
        form.items = vec![
            ManualEntryItem::new("Bread", "250", Category::Food),
            ManualEntryItem::new("Milk", "not-a-number", Category::Food),
        ];
        form
    }

    #[tokio::test]
    async fn manual_entry_is_recorded() {
        let usecase = usecase();
        let receipt = usecase.submit_manual_entry(bread_and_milk()).await.unwrap();
        assert_eq!(receipt.total(), 250.0);
        assert_eq!(usecase.receipts().await.unwrap(), vec![receipt]);
    }

    #[tokio::test]
    async fn removing_first_of_two_items() {
        let usecase = usecase();
        let receipt = usecase.submit_manual_entry(bread_and_milk()).await.unwrap();

        assert_eq!(usecase.remove_item(&receipt.id, 0).await.unwrap(), Some(0.0));
        let stored = usecase.receipts().await.unwrap().remove(0);
        assert_eq!(stored.items().len(), 1);
        assert_eq!(stored.total(), stored.items()[0].price);

        assert_eq!(usecase.remove_item(&receipt.id, 5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_keeps_budget() {
        let usecase = usecase();
        usecase.submit_manual_entry(bread_and_milk()).await.unwrap();
        usecase.set_monthly_budget(12000.0).await.unwrap();

        usecase.clear_receipts().await.unwrap();
        assert!(usecase.receipts().await.unwrap().is_empty());
        assert_eq!(usecase.monthly_budget().await.unwrap(), 12000.0);
        assert!(usecase.set_monthly_budget(-5.0).await.is_err());
    }
}
