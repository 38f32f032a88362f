//! Runtime environment helpers
//!
//! Opens the document store at startup and fails fast when the backing
//! file cannot be read or parsed.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use configs::StorageConfig;

use crate::data_store::DataStore;
use crate::storage::{JsonFileStore, Location};

/// Resolve the working file, create an empty document if there is none,
/// and load it once so a corrupt file stops the process before it serves.
pub async fn open_data_store(cfg: &StorageConfig) -> anyhow::Result<Arc<DataStore>> {
    let location = Location::from_config(cfg);
    common::env::ensure_data_dir(location.working_path()).await?;

    let file = JsonFileStore::new(location.clone());
    if file.create_if_missing().await.context("initializing document")? {
        info!(path = %location.working_path().display(), "created empty document");
    }

    let store = DataStore::new(Arc::new(file));
    let doc = store
        .verify()
        .await
        .with_context(|| format!("document at {} is unusable", store.describe()))?;
    info!(
        path = %store.describe(),
        ephemeral = location.is_ephemeral(),
        users = doc.users.len(),
        projects = doc.projects.len(),
        tasks = doc.tasks.len(),
        "document store ready"
    );
    Ok(Arc::new(store))
}
