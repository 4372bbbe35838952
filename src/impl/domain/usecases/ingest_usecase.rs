use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::{
    domain::{
        logic::{in_flight_guard::InFlightGuard, receipt_builder::ReceiptBuilder},
        repositories::{
            annotation_repository::AnnotationRepository, image_repository::ImageRepository,
            ledger_repository::LedgerRepository,
        },
    },
    entities::{Clock, Connectivity, GalleryImage, ImageId, IngestionOutcome, IngestionReport},
};

/// Turns captured images into receipts.
///
/// Failures never escape as errors: every attempt ends in an
/// `IngestionOutcome`, and anything short of `Linked` leaves the image
/// unprocessed so it can be retried.
#[async_trait]
pub trait IngestUsecase: Send + Sync {
    /// Stores a new image and, when online, analyzes it straight away.
    async fn capture(&self, image_data: Vec<u8>, connectivity: Connectivity) -> IngestionReport;

    /// Runs a fresh annotation attempt on a stored, unprocessed image.
    async fn retry(&self, image_id: &ImageId) -> IngestionReport;
}

pub(crate) struct IngestUsecaseImpl {
    images: Arc<dyn ImageRepository>,
    ledger: Arc<dyn LedgerRepository>,
    annotator: Arc<dyn AnnotationRepository>,
    clock: Arc<dyn Clock>,
    in_flight: InFlightGuard,
    deadline: Duration,
}

#[async_trait]
impl IngestUsecase for IngestUsecaseImpl {
    async fn capture(&self, image_data: Vec<u8>, connectivity: Connectivity) -> IngestionReport {
        let image = GalleryImage::capture(image_data, self.clock.now());
        let image_id = image.id.clone();
        if let Err(e) = self.images.save(&image).await {
            error!(image_id = %image_id, error = %e, "could not store captured image");
            return IngestionReport {
                image_id: None,
                outcome: IngestionOutcome::ImageNotSaved,
            };
        }
        info!(image_id = %image_id, ?connectivity, "stored captured image");

        let outcome = match connectivity {
            Connectivity::Offline => IngestionOutcome::Offline,
            Connectivity::Online => match self.in_flight.acquire(&image_id) {
                Some(_ticket) => self.process(image).await,
                None => IngestionOutcome::AlreadyInFlight,
            },
        };
        IngestionReport {
            image_id: Some(image_id),
            outcome,
        }
    }

    async fn retry(&self, image_id: &ImageId) -> IngestionReport {
        let report = |outcome| IngestionReport {
            image_id: Some(image_id.clone()),
            outcome,
        };
        let Some(_ticket) = self.in_flight.acquire(image_id) else {
            info!(image_id = %image_id, "retry ignored; analysis already running");
            return report(IngestionOutcome::AlreadyInFlight);
        };
        let image = match self.images.get(image_id).await {
            Ok(Some(image)) => image,
            Ok(None) => return report(IngestionOutcome::ImageNotFound),
            Err(e) => {
                error!(image_id = %image_id, error = %e, "could not load image for retry");
                return report(IngestionOutcome::StorageFailed);
            }
        };
        if image.is_processed() {
            return report(IngestionOutcome::AlreadyProcessed);
        }
        report(self.process(image).await)
    }
}

impl IngestUsecaseImpl {
    pub(crate) fn new(
        images: Arc<dyn ImageRepository>,
        ledger: Arc<dyn LedgerRepository>,
        annotator: Arc<dyn AnnotationRepository>,
        clock: Arc<dyn Clock>,
        deadline: Duration,
    ) -> Self {
        Self {
            images,
            ledger,
            annotator,
            clock,
            in_flight: InFlightGuard::new(),
            deadline,
        }
    }

    /// One annotation attempt. Callers must hold the image's in-flight
    /// ticket.
    async fn process(&self, image: GalleryImage) -> IngestionOutcome {
        let extraction =
            match tokio::time::timeout(self.deadline, self.annotator.analyze(image.image_data()))
                .await
            {
                Ok(Ok(extraction)) => extraction,
                Ok(Err(e)) => {
                    warn!(image_id = %image.id, error = %e, "annotation request failed");
                    return IngestionOutcome::ConnectionFailed;
                }
                Err(_) => {
                    warn!(
                        image_id = %image.id,
                        deadline_secs = self.deadline.as_secs(),
                        "annotation request timed out"
                    );
                    return IngestionOutcome::ConnectionFailed;
                }
            };
        if !extraction.is_readable {
            info!(image_id = %image.id, "receipt not readable");
            return IngestionOutcome::Unreadable;
        }

        let receipt = ReceiptBuilder::from_extraction(extraction, image.id.clone(), self.clock.now());
        if let Err(e) = self.ledger.append(receipt.clone()).await {
            error!(image_id = %image.id, error = %e, "could not store receipt");
            return IngestionOutcome::StorageFailed;
        }

        let linked = image.linked_to(receipt.id.clone());
        if let Err(e) = self.images.save(&linked).await {
            error!(
                image_id = %linked.id,
                receipt_id = %receipt.id,
                error = %e,
                "could not link image; removing receipt"
            );
            if let Err(e) = self.ledger.delete(&receipt.id).await {
                error!(receipt_id = %receipt.id, error = %e, "could not remove unlinked receipt");
            }
            return IngestionOutcome::StorageFailed;
        }

        info!(
            image_id = %linked.id,
            receipt_id = %receipt.id,
            total = receipt.total(),
            "receipt linked"
        );
        IngestionOutcome::Linked(receipt)
    }
}
