use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use fractic_server_error::ServerError;

use crate::{
    domain::{
        logic::spend_aggregator::SpendAggregator,
        repositories::ledger_repository::LedgerRepository,
    },
    entities::{Clock, DashboardSummary},
};

#[async_trait]
pub trait DashboardUsecase: Send + Sync {
    async fn summary(&self) -> Result<DashboardSummary, ServerError>;
}

pub(crate) struct DashboardUsecaseImpl {
    ledger: Arc<dyn LedgerRepository>,
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl DashboardUsecase for DashboardUsecaseImpl {
    async fn summary(&self) -> Result<DashboardSummary, ServerError> {
        let receipts = self.ledger.list_all().await?;
        let budget = self.ledger.monthly_budget().await?;
        let today = self.clock.now().with_timezone(&Local).date_naive();
        Ok(SpendAggregator::new(&receipts, budget, today).process())
    }
}

impl DashboardUsecaseImpl {
    pub(crate) fn new(ledger: Arc<dyn LedgerRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}
