use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone as _, Utc};
use fractic_receipt_scanner::{
    config::ScannerConfig,
    entities::{
        Category, Connectivity, ExtractionResult, FixedClock, IngestionOutcome, ManualEntryItem,
        ReceiptItem, Tab,
    },
    errors::AnnotationRequestFailed,
    repositories::AnnotationRepository,
    util::ReceiptScannerUtil,
};
use fractic_server_error::ServerError;
use rstest::{fixture, rstest};

/// Replies with the queued results in order, then with transport errors.
struct QueuedAnnotator {
    replies: Mutex<Vec<ExtractionResult>>,
    calls: AtomicUsize,
}

impl QueuedAnnotator {
    fn replying(replies: Vec<ExtractionResult>) -> Arc<Self> {
        let mut replies = replies;
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl AnnotationRepository for QueuedAnnotator {
    async fn analyze(&self, _image_data: &[u8]) -> Result<ExtractionResult, ServerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| AnnotationRequestFailed::new("service unavailable"))
    }
}

fn food_city() -> ExtractionResult {
    ExtractionResult {
        is_readable: true,
        store_name: Some("Food City".to_string()),
        date: NaiveDate::from_ymd_opt(2025, 3, 14),
        time: NaiveTime::from_hms_opt(9, 30, 0),
        total: Some(1500.0),
        dominant_category: Some(Category::Food),
        items: Some(vec![
            ReceiptItem::new("Rice", 900.0, Category::Food),
            ReceiptItem::new("Pen", 600.0, Category::Stationery),
        ]),
    }
}

#[fixture]
fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 14, 6, 0, 0).unwrap()))
}

#[rstest]
#[tokio::test]
async fn online_capture_reaches_dashboard_and_archive(clock: Arc<FixedClock>) {
    let annotator = QueuedAnnotator::replying(vec![food_city()]);
    let scanner = ReceiptScannerUtil::in_memory(annotator.clone(), clock);

    let report = scanner.capture(vec![0xff, 0xd8, 0xff], Connectivity::Online).await;
    assert!(report.outcome.is_linked());
    assert_eq!(scanner.state().active_tab, Tab::History);
    assert!(!scanner.state().is_analyzing);

    let images = scanner.images().await.unwrap();
    assert_eq!(images.len(), 1);
    assert!(images[0].is_processed());
    assert_eq!(scanner.unprocessed_count().await.unwrap(), 0);

    let summary = scanner.dashboard().await.unwrap();
    assert_eq!(summary.total_spent, 1500.0);
    assert_eq!(summary.category_spend.len(), 2);
    assert!(scanner.render_archive().await.unwrap().contains("Food City"));
}

#[rstest]
#[tokio::test]
async fn offline_capture_then_retry(clock: Arc<FixedClock>) {
    let annotator = QueuedAnnotator::replying(vec![food_city()]);
    let scanner = ReceiptScannerUtil::in_memory(annotator.clone(), clock);

    let report = scanner.capture(vec![1, 2, 3], Connectivity::Offline).await;
    assert_eq!(report.outcome, IngestionOutcome::Offline);
    assert_eq!(annotator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(scanner.state().active_tab, Tab::Gallery);
    assert_eq!(
        scanner.state().notice.as_deref(),
        Some("Offline: Image saved to gallery. Scan when back online.")
    );
    assert!(scanner.receipts().await.unwrap().is_empty());

    let image_id = report.image_id.unwrap();
    let retried = scanner.retry(&image_id).await;
    assert!(retried.outcome.is_linked());
    assert!(scanner.state().notice.is_none());
    assert!(scanner.image(&image_id).await.unwrap().is_processed());
}

#[rstest]
#[tokio::test]
async fn unreadable_receipt_can_be_entered_manually(clock: Arc<FixedClock>) {
    let annotator = QueuedAnnotator::replying(vec![ExtractionResult::unreadable()]);
    let scanner = ReceiptScannerUtil::in_memory(annotator, clock);

    let report = scanner.capture(vec![9], Connectivity::Online).await;
    assert_eq!(report.outcome, IngestionOutcome::Unreadable);
    assert_eq!(scanner.unprocessed_count().await.unwrap(), 1);
    assert!(scanner.receipts().await.unwrap().is_empty());

    let mut form = scanner.blank_manual_entry();
    form.items = vec![
        ManualEntryItem::new("Bread", "250", Category::Food),
        ManualEntryItem::new("Milk", "not-a-number", Category::Food),
    ];
    let receipt = scanner.submit_manual_entry(form).await.unwrap();
    assert_eq!(receipt.total(), 250.0);
    assert_eq!(receipt.store_name, "Manual Entry");
    assert_eq!(scanner.state().active_tab, Tab::History);
}

#[rstest]
#[tokio::test]
async fn item_removal_and_deletion_keep_images(clock: Arc<FixedClock>) {
    let annotator = QueuedAnnotator::replying(vec![food_city()]);
    let scanner = ReceiptScannerUtil::in_memory(annotator, clock);
    let report = scanner.capture(vec![1], Connectivity::Online).await;
    let receipt_id = report.outcome.receipt().unwrap().id.clone();

    assert_eq!(scanner.remove_item(&receipt_id, 0).await.unwrap(), Some(600.0));
    assert_eq!(scanner.remove_item(&receipt_id, 3).await.unwrap(), None);
    let receipt = scanner.receipts().await.unwrap().remove(0);
    assert_eq!(receipt.items(), &[ReceiptItem::new("Pen", 600.0, Category::Stationery)]);

    scanner.delete_receipt(&receipt_id).await.unwrap();
    assert!(scanner.receipts().await.unwrap().is_empty());
    assert_eq!(scanner.images().await.unwrap().len(), 1);
}

#[rstest]
#[tokio::test]
async fn persisted_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = ScannerConfig {
        data_dir: dir.path().to_path_buf(),
        api_key_env: "RECEIPT_SCANNER_TEST_UNSET_KEY".to_string(),
        ..Default::default()
    };

    let scanner = ReceiptScannerUtil::new(&config).unwrap();
    let report = scanner.capture(vec![0xff, 0xd8], Connectivity::Offline).await;
    scanner.set_monthly_budget(15000.0).await.unwrap();

    let mut form = scanner.blank_manual_entry();
    form.store_name = "Pharmacy".to_string();
    form.items = vec![ManualEntryItem::new("Panadol", "120 Rs", Category::Medicine)];
    scanner.submit_manual_entry(form).await.unwrap();
    let export = dir.path().join("archive.csv");
    scanner.export_csv(&export).await.unwrap();

    // Without an API key, analysis fails softly and the image stays queued.
    let retried = scanner.retry(report.image_id.as_ref().unwrap()).await;
    assert_eq!(retried.outcome, IngestionOutcome::ConnectionFailed);

    let reopened = ReceiptScannerUtil::new(&config).unwrap();
    assert_eq!(reopened.monthly_budget().await.unwrap(), 15000.0);
    assert_eq!(reopened.unprocessed_count().await.unwrap(), 1);
    let receipts = reopened.receipts().await.unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].total(), 120.0);

    let csv = std::fs::read_to_string(export).unwrap();
    assert!(csv.contains("Pharmacy"));
    assert!(csv.contains("Panadol,Medicine,120.0,120.0"));
}
