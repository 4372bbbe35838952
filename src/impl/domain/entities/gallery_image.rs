use chrono::{DateTime, Utc};

use super::receipt::ReceiptId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub(crate) String);

impl ImageId {
    pub(crate) fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A captured or uploaded receipt photo.
///
/// The processed flag and the receipt link are a single field: an image is
/// processed exactly when it is linked to the receipt it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub id: ImageId,
    pub captured_at: DateTime<Utc>,
    image_data: Vec<u8>,
    linked_receipt_id: Option<ReceiptId>,
}

impl GalleryImage {
    pub(crate) fn capture(image_data: Vec<u8>, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: ImageId::generate(),
            captured_at,
            image_data,
            linked_receipt_id: None,
        }
    }

    pub(crate) fn restore(
        id: ImageId,
        captured_at: DateTime<Utc>,
        image_data: Vec<u8>,
        linked_receipt_id: Option<ReceiptId>,
    ) -> Self {
        Self {
            id,
            captured_at,
            image_data,
            linked_receipt_id,
        }
    }

    pub fn image_data(&self) -> &[u8] {
        &self.image_data
    }

    pub fn is_processed(&self) -> bool {
        self.linked_receipt_id.is_some()
    }

    pub fn linked_receipt_id(&self) -> Option<&ReceiptId> {
        self.linked_receipt_id.as_ref()
    }

    /// Marks the image processed and linked to `receipt_id`.
    pub(crate) fn linked_to(self, receipt_id: ReceiptId) -> Self {
        Self {
            linked_receipt_id: Some(receipt_id),
            ..self
        }
    }
}
