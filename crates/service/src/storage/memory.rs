use async_trait::async_trait;
use tokio::sync::Mutex;

use models::Document;

use super::{DocumentStore, StorageError};

/// In-memory document store for tests.
///
/// Keeps the serialized text rather than the value so that every load goes
/// through the same parse path as the file backend.
#[derive(Debug)]
pub struct MemoryStore {
    text: Mutex<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_text("{}")
    }

    pub fn with_document(doc: &Document) -> Self {
        Self::with_text(doc.to_pretty_json().unwrap_or_else(|_| "{}".to_string()))
    }

    /// Seed with raw text, valid or not.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: Mutex::new(text.into()) }
    }

    pub async fn text(&self) -> String {
        self.text.lock().await.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<Document, StorageError> {
        let text = self.text.lock().await;
        Document::from_slice(text.as_bytes())
            .map_err(|source| StorageError::Corrupt { location: self.describe(), source })
    }

    async fn save(&self, doc: &Document) -> Result<(), StorageError> {
        let data = doc
            .to_pretty_json()
            .map_err(|source| StorageError::Corrupt { location: self.describe(), source })?;
        *self.text.lock().await = data;
        Ok(())
    }

    fn describe(&self) -> String { "memory".to_string() }
}
