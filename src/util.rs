use std::{
    path::Path,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use fractic_server_error::ServerError;
use iso_currency::Currency;
use tracing::warn;

use crate::{
    config::ScannerConfig,
    data::repositories::{
        annotation_repository_impl::{AnnotationRepositoryImpl, UnconfiguredAnnotationRepository},
        image_repository_impl::ImageRepositoryImpl,
        ledger_repository_impl::LedgerRepositoryImpl,
    },
    domain::usecases::{
        dashboard_usecase::{DashboardUsecase as _, DashboardUsecaseImpl},
        gallery_usecase::{GalleryUsecase as _, GalleryUsecaseImpl},
        ingest_usecase::{IngestUsecase as _, IngestUsecaseImpl},
        ledger_usecase::{LedgerUsecase as _, LedgerUsecaseImpl},
    },
    entities::{
        AppAction, AppState, Clock, Connectivity, DashboardSummary, GalleryImage, ImageId,
        IngestionReport, ManualEntryForm, Receipt, ReceiptId, SystemClock, Tab,
    },
    errors::{ReadError, WriteError},
    presentation::{csv_exporter::CsvExporter, report_printer::ReportPrinter},
    repositories::{AnnotationRepository, ImageRepository, LedgerRepository},
};

/// Entry point for driving the scanner: capture and retry, manual entry,
/// ledger maintenance, and the three text views.
///
/// Also owns the application state, which every operation updates through
/// `AppState::reduce`.
pub struct ReceiptScannerUtil {
    ingest_usecase: IngestUsecaseImpl,
    gallery_usecase: GalleryUsecaseImpl,
    ledger_usecase: LedgerUsecaseImpl,
    dashboard_usecase: DashboardUsecaseImpl,
    printer: ReportPrinter,
    exporter: CsvExporter,
    clock: Arc<dyn Clock>,
    state: Mutex<AppState>,
}

impl ReceiptScannerUtil {
    /// Filesystem-backed scanner using the configured annotation service.
    ///
    /// A missing API key is not an error here: offline capture and the
    /// views still work, and analysis attempts fail with a connection
    /// notice until a key is provided.
    pub fn new(config: &ScannerConfig) -> Result<Self, ServerError> {
        let currency = config.currency()?;
        let annotator: Arc<dyn AnnotationRepository> = match config.api_key() {
            Ok(api_key) => Arc::new(AnnotationRepositoryImpl::new(
                &config.endpoint,
                &config.model,
                api_key,
                config.annotation_deadline(),
                currency,
            )?),
            Err(e) => {
                warn!(error = %e, "annotation service not configured");
                Arc::new(UnconfiguredAnnotationRepository::new(&config.api_key_env))
            }
        };
        Ok(Self::with_repositories(
            Arc::new(ImageRepositoryImpl::new(config.gallery_dir())),
            Arc::new(LedgerRepositoryImpl::new(
                config.ledger_path(),
                config.default_monthly_budget,
            )),
            annotator,
            Arc::new(SystemClock),
            config.annotation_deadline(),
            currency,
        ))
    }

    /// Non-persistent scanner with default settings.
    pub fn in_memory(annotator: Arc<dyn AnnotationRepository>, clock: Arc<dyn Clock>) -> Self {
        let defaults = ScannerConfig::default();
        Self::with_repositories(
            Arc::new(ImageRepositoryImpl::in_memory()),
            Arc::new(LedgerRepositoryImpl::in_memory(
                defaults.default_monthly_budget,
            )),
            annotator,
            clock,
            defaults.annotation_deadline(),
            Currency::LKR,
        )
    }

    pub fn with_repositories(
        images: Arc<dyn ImageRepository>,
        ledger: Arc<dyn LedgerRepository>,
        annotator: Arc<dyn AnnotationRepository>,
        clock: Arc<dyn Clock>,
        annotation_deadline: Duration,
        currency: Currency,
    ) -> Self {
        Self {
            ingest_usecase: IngestUsecaseImpl::new(
                Arc::clone(&images),
                Arc::clone(&ledger),
                annotator,
                Arc::clone(&clock),
                annotation_deadline,
            ),
            gallery_usecase: GalleryUsecaseImpl::new(images),
            ledger_usecase: LedgerUsecaseImpl::new(Arc::clone(&ledger), Arc::clone(&clock)),
            dashboard_usecase: DashboardUsecaseImpl::new(ledger, Arc::clone(&clock)),
            printer: ReportPrinter::new(currency),
            exporter: CsvExporter::new(),
            clock,
            state: Mutex::new(AppState::default()),
        }
    }

    // Application state.
    // ---

    pub fn state(&self) -> AppState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn select_tab(&self, tab: Tab) {
        self.dispatch(AppAction::SelectTab(tab));
    }

    pub fn dismiss_notice(&self) {
        self.dispatch(AppAction::DismissNotice);
    }

    fn dispatch(&self, action: AppAction) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = std::mem::take(&mut *state).reduce(&action);
    }

    // Ingestion.
    // ---

    pub async fn capture(&self, image_data: Vec<u8>, connectivity: Connectivity) -> IngestionReport {
        if connectivity == Connectivity::Online {
            self.dispatch(AppAction::AnalysisStarted);
        }
        let report = self.ingest_usecase.capture(image_data, connectivity).await;
        self.dispatch(AppAction::IngestionFinished(report.clone()));
        report
    }

    pub async fn capture_file<P>(
        &self,
        path: P,
        connectivity: Connectivity,
    ) -> Result<IngestionReport, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let image_data = tokio::fs::read(path)
            .await
            .map_err(|e| ReadError::with_debug(&e))?;
        Ok(self.capture(image_data, connectivity).await)
    }

    pub async fn retry(&self, image_id: &ImageId) -> IngestionReport {
        self.dispatch(AppAction::AnalysisStarted);
        let report = self.ingest_usecase.retry(image_id).await;
        self.dispatch(AppAction::IngestionFinished(report.clone()));
        report
    }

    // Gallery.
    // ---

    pub async fn images(&self) -> Result<Vec<GalleryImage>, ServerError> {
        self.gallery_usecase.images().await
    }

    pub async fn image(&self, image_id: &ImageId) -> Result<GalleryImage, ServerError> {
        self.gallery_usecase.image(image_id).await
    }

    pub async fn delete_image(&self, image_id: &ImageId) -> Result<(), ServerError> {
        self.gallery_usecase.delete_image(image_id).await
    }

    pub async fn unprocessed_count(&self) -> Result<usize, ServerError> {
        self.gallery_usecase.unprocessed_count().await
    }

    // Ledger.
    // ---

    /// Empty form dated now.
    pub fn blank_manual_entry(&self) -> ManualEntryForm {
        ManualEntryForm::blank(self.clock.now())
    }

    pub async fn submit_manual_entry(&self, form: ManualEntryForm) -> Result<Receipt, ServerError> {
        let receipt = self.ledger_usecase.submit_manual_entry(form).await?;
        self.dispatch(AppAction::ReceiptRecorded);
        Ok(receipt)
    }

    pub async fn remove_item(
        &self,
        receipt_id: &ReceiptId,
        item_index: usize,
    ) -> Result<Option<f64>, ServerError> {
        self.ledger_usecase.remove_item(receipt_id, item_index).await
    }

    /// Callers are responsible for confirming with the user first.
    pub async fn delete_receipt(&self, receipt_id: &ReceiptId) -> Result<(), ServerError> {
        self.ledger_usecase.delete_receipt(receipt_id).await
    }

    /// Callers are responsible for confirming with the user first.
    pub async fn clear_receipts(&self) -> Result<(), ServerError> {
        self.ledger_usecase.clear_receipts().await
    }

    pub async fn receipts(&self) -> Result<Vec<Receipt>, ServerError> {
        self.ledger_usecase.receipts().await
    }

    pub async fn monthly_budget(&self) -> Result<f64, ServerError> {
        self.ledger_usecase.monthly_budget().await
    }

    pub async fn set_monthly_budget(&self, budget: f64) -> Result<(), ServerError> {
        self.ledger_usecase.set_monthly_budget(budget).await
    }

    // Views.
    // ---

    pub async fn dashboard(&self) -> Result<DashboardSummary, ServerError> {
        self.dashboard_usecase.summary().await
    }

    pub async fn render_dashboard(&self) -> Result<String, ServerError> {
        Ok(self.printer.print_dashboard(&self.dashboard().await?))
    }

    pub async fn render_vault(&self) -> Result<String, ServerError> {
        Ok(self.printer.print_vault(&self.images().await?))
    }

    pub async fn render_archive(&self) -> Result<String, ServerError> {
        Ok(self.printer.print_archive(&self.receipts().await?))
    }

    pub async fn archive_csv(&self) -> Result<Vec<u8>, ServerError> {
        self.exporter.export(&self.receipts().await?)
    }

    pub async fn export_csv<P>(&self, path: P) -> Result<(), ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let csv = self.archive_csv().await?;
        tokio::fs::write(path.as_ref(), csv)
            .await
            .map_err(|e| WriteError::with_debug(&path.as_ref().display().to_string(), &e))
    }
}
