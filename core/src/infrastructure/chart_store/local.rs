use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::domain::{
    chart::{
        entities::{ChartName, StoredChart, sha256_hex},
        ports::ChartStore,
    },
    common::entities::app_errors::CoreError,
};

/// Stores charts as files directly under one output directory
#[derive(Debug, Clone)]
pub struct LocalChartStore {
    root: PathBuf,
}

impl LocalChartStore {
    /// Opens the store, creating the output directory when missing
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, CoreError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            error!(path = %root.display(), error = %e, "Failed to create output directory");
            CoreError::StorageError(format!("cannot create {}: {e}", root.display()))
        })?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &ChartName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Temporary sibling of `name`; the leading dot keeps it outside the
    /// set of valid chart names.
    fn staging_path(&self, name: &ChartName) -> PathBuf {
        self.root
            .join(format!(".{}.{}.tmp", name.as_str(), Uuid::new_v4().simple()))
    }
}

impl ChartStore for LocalChartStore {
    #[instrument(skip(self, png), fields(chart = %name, size = png.len()))]
    async fn save(&self, name: &ChartName, png: Bytes) -> Result<StoredChart, CoreError> {
        let staging = self.staging_path(name);
        let target = self.path_of(name);

        if let Err(e) = tokio::fs::write(&staging, &png).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(CoreError::StorageError(format!("cannot write {name}: {e}")));
        }

        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(CoreError::StorageError(format!("cannot publish {name}: {e}")));
        }

        debug!(path = %target.display(), "Chart stored");

        Ok(StoredChart {
            name: name.clone(),
            size_bytes: png.len() as u64,
            checksum_sha256: sha256_hex(&png),
        })
    }

    #[instrument(skip(self), fields(chart = %name))]
    async fn load(&self, name: &ChartName) -> Result<Bytes, CoreError> {
        match tokio::fs::read(self.path_of(name)).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CoreError::ChartNotFound(name.to_string()))
            }
            Err(e) => Err(CoreError::StorageError(format!("cannot read {name}: {e}"))),
        }
    }

    #[instrument(skip(self), fields(chart = %name))]
    async fn remove(&self, name: &ChartName) -> Result<(), CoreError> {
        match tokio::fs::remove_file(self.path_of(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::StorageError(format!("cannot remove {name}: {e}"))),
        }
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        let metadata = tokio::fs::metadata(&self.root).await.map_err(|e| {
            CoreError::StorageError(format!("output directory unavailable: {e}"))
        })?;

        if !metadata.is_dir() {
            return Err(CoreError::StorageError(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        Ok(())
    }
}
