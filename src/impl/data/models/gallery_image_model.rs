use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::DateTime;
use fractic_server_error::ServerError;
use tracing::warn;

use crate::{
    entities::{GalleryImage, ImageId, ReceiptId},
    errors::InvalidImageEncoding,
};

/// On-disk form of a gallery image: one JSON document per image with the
/// image bytes base64-encoded.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GalleryImageModel {
    pub id: String,
    pub base64: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub is_processed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_receipt_id: Option<String>,
}

impl From<&GalleryImage> for GalleryImageModel {
    fn from(image: &GalleryImage) -> Self {
        GalleryImageModel {
            id: image.id.as_str().to_string(),
            base64: STANDARD.encode(image.image_data()),
            timestamp: image.captured_at.timestamp_millis(),
            is_processed: image.is_processed(),
            linked_receipt_id: image.linked_receipt_id().map(|r| r.as_str().to_string()),
        }
    }
}

impl TryFrom<GalleryImageModel> for GalleryImage {
    type Error = ServerError;

    fn try_from(model: GalleryImageModel) -> Result<Self, Self::Error> {
        let image_data = STANDARD
            .decode(model.base64.as_bytes())
            .map_err(|e| InvalidImageEncoding::with_debug(&model.id, &e))?;
        let link = match (model.is_processed, model.linked_receipt_id) {
            (true, Some(receipt_id)) => Some(ReceiptId(receipt_id)),
            (is_processed, linked_receipt_id) => {
                if is_processed || linked_receipt_id.is_some() {
                    warn!(
                        image_id = %model.id,
                        is_processed,
                        ?linked_receipt_id,
                        "inconsistent processed/link state on stored image; treating as unprocessed"
                    );
                }
                None
            }
        };
        Ok(GalleryImage::restore(
            ImageId(model.id),
            DateTime::from_timestamp_millis(model.timestamp).unwrap_or_default(),
            image_data,
            link,
        ))
    }
}
