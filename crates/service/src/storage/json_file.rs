use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use models::Document;

use super::location::{display, Location};
use super::{DocumentStore, StorageError};

/// JSON file-backed document store.
///
/// Every `load` re-reads the file; every `save` rewrites it in full
/// (pretty-printed) through a sibling temp file that is renamed into place.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    location: Location,
}

impl JsonFileStore {
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    /// Store over a single file with no scratch indirection.
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self::new(Location::canonical(path))
    }

    /// Write an empty document if the working file does not exist yet.
    /// Returns whether a file was created.
    pub async fn create_if_missing(&self) -> Result<bool, StorageError> {
        let path = self.location.resolve().await?;
        if fs::metadata(&path).await.is_ok() {
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Unavailable { location: display(parent), source })?;
        }
        self.save(&Document::default()).await?;
        Ok(true)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<Document, StorageError> {
        let path = self.location.resolve().await?;
        let bytes = fs::read(&path)
            .await
            .map_err(|source| StorageError::Unavailable { location: display(&path), source })?;
        let doc = Document::from_slice(&bytes)
            .map_err(|source| StorageError::Corrupt { location: display(&path), source })?;
        debug!(path = %path.display(), bytes = bytes.len(), "document loaded");
        Ok(doc)
    }

    async fn save(&self, doc: &Document) -> Result<(), StorageError> {
        let path = self.location.resolve().await?;
        let data = doc
            .to_pretty_json()
            .map_err(|source| StorageError::Corrupt { location: display(&path), source })?;
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data.as_bytes())
            .await
            .map_err(|source| StorageError::Unavailable { location: display(&tmp), source })?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|source| StorageError::Unavailable { location: display(&path), source })?;
        debug!(path = %path.display(), bytes = data.len(), "document saved");
        Ok(())
    }

    fn describe(&self) -> String {
        display(self.location.working_path())
    }
}
