use std::path::PathBuf;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::Mutex;

use crate::{
    data::{
        datasources::ledger_datasource::{
            LedgerDatasource, LedgerJsonDatasourceImpl, LedgerMemoryDatasourceImpl,
        },
        models::ledger_document_model::{LedgerDocumentModel, ReceiptModel},
    },
    domain::repositories::ledger_repository::LedgerRepository,
    entities::{Receipt, ReceiptId},
    errors::InvalidMonthlyBudget,
};

pub(crate) struct LedgerRepositoryImpl<DS: LedgerDatasource> {
    datasource: DS,
    default_monthly_budget: f64,
    // Held across every load-modify-store.
    write_lock: Mutex<()>,
}

impl<DS: LedgerDatasource> LedgerRepositoryImpl<DS> {
    async fn load_receipts(&self) -> Result<(Vec<Receipt>, Option<f64>), ServerError> {
        let LedgerDocumentModel {
            receipts,
            monthly_budget,
        } = self.datasource.load().await?;
        let receipts: Vec<Receipt> = receipts
            .into_iter()
            .map(Receipt::from)
            .collect();
        Ok((receipts, monthly_budget))
    }

    async fn store_receipts(
        &self,
        receipts: &[Receipt],
        monthly_budget: Option<f64>,
    ) -> Result<(), ServerError> {
        self.datasource
            .store(&LedgerDocumentModel {
                receipts: receipts.iter().map(ReceiptModel::from).collect(),
                monthly_budget,
            })
            .await
    }
}

#[async_trait]
impl<DS: LedgerDatasource> LedgerRepository for LedgerRepositoryImpl<DS> {
    async fn append(&self, receipt: Receipt) -> Result<(), ServerError> {
        let _guard = self.write_lock.lock().await;
        let (mut receipts, budget) = self.load_receipts().await?;
        receipts.insert(0, receipt);
        self.store_receipts(&receipts, budget).await
    }

    async fn remove_item(
        &self,
        receipt_id: &ReceiptId,
        item_index: usize,
    ) -> Result<Option<f64>, ServerError> {
        let _guard = self.write_lock.lock().await;
        let (mut receipts, budget) = self.load_receipts().await?;
        let Some(receipt) = receipts.iter_mut().find(|r| &r.id == receipt_id) else {
            return Ok(None);
        };
        if receipt.remove_item(item_index).is_none() {
            return Ok(None);
        }
        let total = receipt.total();
        self.store_receipts(&receipts, budget).await?;
        Ok(Some(total))
    }

    async fn delete(&self, receipt_id: &ReceiptId) -> Result<(), ServerError> {
        let _guard = self.write_lock.lock().await;
        let (mut receipts, budget) = self.load_receipts().await?;
        let before = receipts.len();
        receipts.retain(|r| &r.id != receipt_id);
        if receipts.len() == before {
            return Ok(());
        }
        self.store_receipts(&receipts, budget).await
    }

    async fn clear(&self) -> Result<(), ServerError> {
        let _guard = self.write_lock.lock().await;
        let (_, budget) = self.load_receipts().await?;
        self.store_receipts(&[], budget).await
    }

    async fn list_all(&self) -> Result<Vec<Receipt>, ServerError> {
        Ok(self.load_receipts().await?.0)
    }

    async fn monthly_budget(&self) -> Result<f64, ServerError> {
        Ok(self
            .datasource
            .load()
            .await?
            .monthly_budget
            .unwrap_or(self.default_monthly_budget))
    }

    async fn set_monthly_budget(&self, budget: f64) -> Result<(), ServerError> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(InvalidMonthlyBudget::new(budget));
        }
        let _guard = self.write_lock.lock().await;
        let mut document = self.datasource.load().await?;
        document.monthly_budget = Some(budget);
        self.datasource.store(&document).await
    }
}

impl LedgerRepositoryImpl<LedgerJsonDatasourceImpl> {
    pub(crate) fn new(path: impl Into<PathBuf>, default_monthly_budget: f64) -> Self {
        LedgerRepositoryImpl {
            datasource: LedgerJsonDatasourceImpl::new(path),
            default_monthly_budget,
            write_lock: Mutex::new(()),
        }
    }
}

impl LedgerRepositoryImpl<LedgerMemoryDatasourceImpl> {
    pub(crate) fn in_memory(default_monthly_budget: f64) -> Self {
        LedgerRepositoryImpl {
            datasource: LedgerMemoryDatasourceImpl::new(),
            default_monthly_budget,
            write_lock: Mutex::new(()),
        }
    }
}
