use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tracing::info;

use crate::{
    domain::repositories::image_repository::ImageRepository,
    entities::{GalleryImage, ImageId},
    errors::ImageNotFound,
};

#[async_trait]
pub trait GalleryUsecase: Send + Sync {
    /// Newest capture first.
    async fn images(&self) -> Result<Vec<GalleryImage>, ServerError>;

    async fn image(&self, id: &ImageId) -> Result<GalleryImage, ServerError>;

    /// Removes the image only; a receipt produced from it is kept.
    async fn delete_image(&self, id: &ImageId) -> Result<(), ServerError>;

    async fn unprocessed_count(&self) -> Result<usize, ServerError>;
}

pub(crate) struct GalleryUsecaseImpl {
    images: Arc<dyn ImageRepository>,
}

#[async_trait]
impl GalleryUsecase for GalleryUsecaseImpl {
    async fn images(&self) -> Result<Vec<GalleryImage>, ServerError> {
        self.images.list_all().await
    }

    async fn image(&self, id: &ImageId) -> Result<GalleryImage, ServerError> {
        self.images
            .get(id)
            .await?
            .ok_or_else(|| ImageNotFound::new(id.as_str()))
    }

    async fn delete_image(&self, id: &ImageId) -> Result<(), ServerError> {
        self.images.delete(id).await?;
        info!(image_id = %id, "deleted gallery image");
        Ok(())
    }

    async fn unprocessed_count(&self) -> Result<usize, ServerError> {
        Ok(self
            .images
            .list_all()
            .await?
            .iter()
            .filter(|image| !image.is_processed())
            .count())
    }
}

impl GalleryUsecaseImpl {
    pub(crate) fn new(images: Arc<dyn ImageRepository>) -> Self {
        Self { images }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{data::repositories::image_repository_impl::ImageRepositoryImpl, entities::ReceiptId};

    #[tokio::test]
    async fn counts_unprocessed_and_deletes() {
        let repository = Arc::new(ImageRepositoryImpl::in_memory());
        let pending = GalleryImage::capture(vec![1], Utc::now());
        let done = GalleryImage::capture(vec![2], Utc::now()).linked_to(ReceiptId::from("r"));
        repository.save(&pending).await.unwrap();
        repository.save(&done).await.unwrap();

        let usecase = GalleryUsecaseImpl::new(repository);
        assert_eq!(usecase.unprocessed_count().await.unwrap(), 1);

        usecase.delete_image(&pending.id).await.unwrap();
        assert_eq!(usecase.unprocessed_count().await.unwrap(), 0);
        assert!(usecase.image(&pending.id).await.is_err());
        assert_eq!(usecase.image(&done.id).await.unwrap(), done);
    }
}
