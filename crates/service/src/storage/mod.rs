//! Storage abstractions for the service layer
//!
//! The whole document is loaded and saved as one unit. Backends differ only
//! in where the bytes live: a JSON file on disk for production, memory for
//! tests.

pub mod json_file;
pub mod location;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use models::Document;

pub use json_file::JsonFileStore;
pub use location::Location;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable at {location}: {source}")]
    Unavailable {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt document at {location}: {source}")]
    Corrupt {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load/save primitives over the persisted document.
///
/// `load` never caches: every call reads the backing medium again.
/// `save` replaces the whole document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> Result<Document, StorageError>;
    async fn save(&self, doc: &Document) -> Result<(), StorageError>;
    /// Human readable location for logs.
    fn describe(&self) -> String;
}
