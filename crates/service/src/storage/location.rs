use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use configs::StorageConfig;
use models::Document;

use super::StorageError;

/// Which file backs reads and writes.
///
/// On platforms that ship a read-only bundle, the canonical file cannot be
/// written. There the working copy lives in a scratch directory and is seeded
/// from the canonical file the first time it is needed (and again if the
/// scratch area was wiped).
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    canonical: PathBuf,
    scratch: Option<PathBuf>,
}

impl Location {
    pub fn canonical<P: Into<PathBuf>>(path: P) -> Self {
        Self { canonical: path.into(), scratch: None }
    }

    pub fn ephemeral<P: Into<PathBuf>, S: AsRef<Path>>(canonical: P, scratch_dir: S) -> Self {
        let canonical = canonical.into();
        let file_name = canonical.file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("db.json"));
        let scratch = scratch_dir.as_ref().join(file_name);
        Self { canonical, scratch: Some(scratch) }
    }

    pub fn from_config(cfg: &StorageConfig) -> Self {
        if cfg.ephemeral || common::env::is_ephemeral_platform() {
            Self::ephemeral(&cfg.path, &cfg.scratch_dir)
        } else {
            Self::canonical(&cfg.path)
        }
    }

    pub fn is_ephemeral(&self) -> bool { self.scratch.is_some() }

    /// The file reads and writes go to, without touching the filesystem.
    pub fn working_path(&self) -> &Path {
        self.scratch.as_deref().unwrap_or(&self.canonical)
    }

    /// Resolve the working path, seeding the scratch copy when it is missing.
    pub async fn resolve(&self) -> Result<PathBuf, StorageError> {
        let Some(scratch) = &self.scratch else {
            return Ok(self.canonical.clone());
        };
        if fs::metadata(scratch).await.is_ok() {
            return Ok(scratch.clone());
        }

        let seed = match fs::read(&self.canonical).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default()
                .to_pretty_json()
                .map_err(|source| StorageError::Corrupt { location: display(&self.canonical), source })?
                .into_bytes(),
            Err(source) => return Err(StorageError::Unavailable { location: display(&self.canonical), source }),
        };
        if let Some(parent) = scratch.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Unavailable { location: display(parent), source })?;
        }
        fs::write(scratch, &seed)
            .await
            .map_err(|source| StorageError::Unavailable { location: display(scratch), source })?;
        info!(from = %self.canonical.display(), to = %scratch.display(), bytes = seed.len(), "seeded scratch copy of document");
        Ok(scratch.clone())
    }
}

pub(crate) fn display(path: &Path) -> String {
    path.display().to_string()
}
