use super::{gallery_image::ImageId, receipt::Receipt};

/// Network availability at the moment an image is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

/// Terminal result of one ingestion attempt. Every variant other than
/// `Linked` leaves the image unprocessed and available for a later retry.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestionOutcome {
    Linked(Receipt),
    Unreadable,
    ConnectionFailed,
    Offline,
    ImageNotSaved,
    StorageFailed,
    ImageNotFound,
    AlreadyProcessed,
    AlreadyInFlight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReport {
    /// Absent when the image itself could not be stored.
    pub image_id: Option<ImageId>,
    pub outcome: IngestionOutcome,
}

impl IngestionOutcome {
    pub fn is_linked(&self) -> bool {
        matches!(self, IngestionOutcome::Linked(_))
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            IngestionOutcome::Linked(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// User-facing message for the outcome, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            IngestionOutcome::Linked(_) => None,
            IngestionOutcome::Unreadable => {
                Some("Could not read receipt details. You can try again or enter manually.")
            }
            IngestionOutcome::ConnectionFailed => {
                Some("Connection error. Image saved to gallery for later processing.")
            }
            IngestionOutcome::Offline => {
                Some("Offline: Image saved to gallery. Scan when back online.")
            }
            IngestionOutcome::ImageNotSaved => Some("Failed to save image to gallery."),
            IngestionOutcome::StorageFailed => {
                Some("Storage error. Receipt could not be linked to its image.")
            }
            IngestionOutcome::ImageNotFound => Some("Image not found in gallery."),
            IngestionOutcome::AlreadyProcessed => Some("This image has already been processed."),
            IngestionOutcome::AlreadyInFlight => Some("This image is already being analyzed."),
        }
    }
}
