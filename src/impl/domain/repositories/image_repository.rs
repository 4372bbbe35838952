use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{GalleryImage, ImageId};

/// Keyed store of captured receipt images.
///
/// There is no partial update: changing an image's link means saving the
/// full updated record.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn save(&self, image: &GalleryImage) -> Result<(), ServerError>;

    async fn get(&self, id: &ImageId) -> Result<Option<GalleryImage>, ServerError>;

    /// Deleting an unknown image is not an error.
    async fn delete(&self, id: &ImageId) -> Result<(), ServerError>;

    /// Newest capture first.
    async fn list_all(&self) -> Result<Vec<GalleryImage>, ServerError>;
}
