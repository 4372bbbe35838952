use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::{fs, sync::Mutex};

use crate::{
    data::models::ledger_document_model::LedgerDocumentModel,
    errors::{InvalidJson, ReadError, WriteError},
};

#[async_trait]
pub(crate) trait LedgerDatasource: Send + Sync {
    /// Returns an empty document if nothing has been stored yet.
    async fn load(&self) -> Result<LedgerDocumentModel, ServerError>;

    async fn store(&self, document: &LedgerDocumentModel) -> Result<(), ServerError>;
}

// Single JSON file.
// ---

pub(crate) struct LedgerJsonDatasourceImpl {
    path: PathBuf,
}

impl LedgerJsonDatasourceImpl {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LedgerDatasource for LedgerJsonDatasourceImpl {
    async fn load(&self) -> Result<LedgerDocumentModel, ServerError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| InvalidJson::with_debug("LedgerDocument", &e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(LedgerDocumentModel::default()),
            Err(e) => Err(ReadError::with_debug(&e)),
        }
    }

    async fn store(&self, document: &LedgerDocumentModel) -> Result<(), ServerError> {
        let display = self.path.display().to_string();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| WriteError::with_debug(&display, &e))?;
        }
        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| InvalidJson::with_debug("LedgerDocument", &e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| WriteError::with_debug(&display, &e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| WriteError::with_debug(&display, &e))
    }
}

// In-memory.
// ---

#[derive(Default)]
pub(crate) struct LedgerMemoryDatasourceImpl {
    document: Mutex<LedgerDocumentModel>,
}

impl LedgerMemoryDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerDatasource for LedgerMemoryDatasourceImpl {
    async fn load(&self) -> Result<LedgerDocumentModel, ServerError> {
        Ok(self.document.lock().await.clone())
    }

    async fn store(&self, document: &LedgerDocumentModel) -> Result<(), ServerError> {
        *self.document.lock().await = document.clone();
        Ok(())
    }
}
