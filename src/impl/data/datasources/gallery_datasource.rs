use std::{collections::HashMap, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::{fs, sync::Mutex};
use tracing::warn;

use crate::{
    data::models::gallery_image_model::GalleryImageModel,
    errors::{InvalidJson, ReadError, WriteError},
};

#[async_trait]
pub(crate) trait GalleryDatasource: Send + Sync {
    async fn write(&self, model: &GalleryImageModel) -> Result<(), ServerError>;

    async fn read(&self, id: &str) -> Result<Option<GalleryImageModel>, ServerError>;

    async fn remove(&self, id: &str) -> Result<(), ServerError>;

    async fn read_all(&self) -> Result<Vec<GalleryImageModel>, ServerError>;
}

// Directory of JSON documents, one per image.
// ---

pub(crate) struct GalleryDirDatasourceImpl {
    dir: PathBuf,
}

impl GalleryDirDatasourceImpl {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        // Ids are generated UUIDs; anything else must not escape the
        // gallery directory.
        let file_name: String = id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

#[async_trait]
impl GalleryDatasource for GalleryDirDatasourceImpl {
    async fn write(&self, model: &GalleryImageModel) -> Result<(), ServerError> {
        let path = self.path_for(&model.id);
        let display = path.display().to_string();
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| WriteError::with_debug(&display, &e))?;
        let json = serde_json::to_vec(model)
            .map_err(|e| InvalidJson::with_debug("GalleryImage", &e))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| WriteError::with_debug(&display, &e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| WriteError::with_debug(&display, &e))
    }

    async fn read(&self, id: &str) -> Result<Option<GalleryImageModel>, ServerError> {
        match fs::read(self.path_for(id)).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| InvalidJson::with_debug("GalleryImage", &e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReadError::with_debug(&e)),
        }
    }

    async fn remove(&self, id: &str) -> Result<(), ServerError> {
        let path = self.path_for(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WriteError::with_debug(&path.display().to_string(), &e)),
        }
    }

    async fn read_all(&self) -> Result<Vec<GalleryImageModel>, ServerError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ReadError::with_debug(&e)),
        };
        let mut models = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ReadError::with_debug(&e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path)
                .await
                .map_err(|e| ReadError::with_debug(&e))?;
            match serde_json::from_slice::<GalleryImageModel>(&bytes) {
                Ok(model) => models.push(model),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable gallery record"),
            }
        }
        Ok(models)
    }
}

// In-memory.
// ---

#[derive(Default)]
pub(crate) struct GalleryMemoryDatasourceImpl {
    records: Mutex<HashMap<String, GalleryImageModel>>,
}

impl GalleryMemoryDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GalleryDatasource for GalleryMemoryDatasourceImpl {
    async fn write(&self, model: &GalleryImageModel) -> Result<(), ServerError> {
        self.records
            .lock()
            .await
            .insert(model.id.clone(), model.clone());
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Option<GalleryImageModel>, ServerError> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn remove(&self, id: &str) -> Result<(), ServerError> {
        self.records.lock().await.remove(id);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<GalleryImageModel>, ServerError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str) -> GalleryImageModel {
        GalleryImageModel {
            id: id.to_string(),
            base64: "AAAA".to_string(),
            timestamp: 1_700_000_000_000,
            is_processed: false,
            linked_receipt_id: None,
        }
    }

    #[tokio::test]
    async fn dir_datasource_persists_records() {
        let dir = tempfile::tempdir().unwrap();
        let datasource = GalleryDirDatasourceImpl::new(dir.path().join("gallery"));

        assert!(datasource.read_all().await.unwrap().is_empty());
        datasource.write(&model("a")).await.unwrap();
        datasource.write(&model("b")).await.unwrap();

        assert_eq!(datasource.read("a").await.unwrap(), Some(model("a")));
        assert!(datasource.read("missing").await.unwrap().is_none());
        assert_eq!(datasource.read_all().await.unwrap().len(), 2);

        datasource.remove("a").await.unwrap();
        datasource.remove("a").await.unwrap();
        assert!(datasource.read("a").await.unwrap().is_none());
        assert_eq!(datasource.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dir_datasource_skips_corrupt_records() {
        let dir = tempfile::tempdir().unwrap();
        let datasource = GalleryDirDatasourceImpl::new(dir.path());
        datasource.write(&model("good")).await.unwrap();
        std::fs::write(dir.path().join("bad.json"), b"not json").unwrap();

        let all = datasource.read_all().await.unwrap();
        assert_eq!(all, vec![model("good")]);
    }

    #[test]
    fn ids_cannot_escape_gallery_dir() {
        let datasource = GalleryDirDatasourceImpl::new("/data/gallery");
        assert_eq!(
            datasource.path_for("../../etc/passwd"),
            PathBuf::from("/data/gallery/etcpasswd.json")
        );
    }
}
