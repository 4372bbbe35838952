use std::path::PathBuf;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tracing::warn;

use crate::{
    data::{
        datasources::gallery_datasource::{
            GalleryDatasource, GalleryDirDatasourceImpl, GalleryMemoryDatasourceImpl,
        },
        models::gallery_image_model::GalleryImageModel,
    },
    domain::repositories::image_repository::ImageRepository,
    entities::{GalleryImage, ImageId},
};

pub(crate) struct ImageRepositoryImpl<DS: GalleryDatasource> {
    datasource: DS,
}

#[async_trait]
impl<DS: GalleryDatasource> ImageRepository for ImageRepositoryImpl<DS> {
    async fn save(&self, image: &GalleryImage) -> Result<(), ServerError> {
        self.datasource.write(&GalleryImageModel::from(image)).await
    }

    async fn get(&self, id: &ImageId) -> Result<Option<GalleryImage>, ServerError> {
        self.datasource
            .read(id.as_str())
            .await?
            .map(GalleryImage::try_from)
            .transpose()
    }

    async fn delete(&self, id: &ImageId) -> Result<(), ServerError> {
        self.datasource.remove(id.as_str()).await
    }

    async fn list_all(&self) -> Result<Vec<GalleryImage>, ServerError> {
        let mut images = self
            .datasource
            .read_all()
            .await?
            .into_iter()
            .filter_map(|model| {
                let id = model.id.clone();
                GalleryImage::try_from(model)
                    .inspect_err(|e| {
                        warn!(image_id = %id, error = %e, "skipping undecodable gallery image")
                    })
                    .ok()
            })
            .collect::<Vec<_>>();
        images.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        Ok(images)
    }
}

impl ImageRepositoryImpl<GalleryDirDatasourceImpl> {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        ImageRepositoryImpl {
            datasource: GalleryDirDatasourceImpl::new(dir),
        }
    }
}

impl ImageRepositoryImpl<GalleryMemoryDatasourceImpl> {
    pub(crate) fn in_memory() -> Self {
        ImageRepositoryImpl {
            datasource: GalleryMemoryDatasourceImpl::new(),
        }
    }
}
