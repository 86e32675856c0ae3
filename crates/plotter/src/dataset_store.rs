//! On-disk storage for uploaded and generated datasets.
//!
//! Every dataset lives in its own directory as `<root>/<id>/data.txt`, so a
//! plot script run inside that directory can refer to the file by its bare
//! name.

use bytes::Bytes;
use object_store::{ObjectStore, PutPayload, local::LocalFileSystem, path::Path};
use std::{path::PathBuf, sync::Arc};
use uuid::Uuid;

use crate::errors::AppError;

/// File name every dataset is stored under.
pub const DATA_FILE: &str = "data.txt";

const SCRATCH_DIR: &str = "scratch";

#[derive(Clone, Debug)]
pub struct DatasetStore {
    store: Arc<dyn ObjectStore>,
    root: PathBuf,
}

impl DatasetStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn new_local(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        std::fs::create_dir_all(root.join(SCRATCH_DIR))?;
        let root = std::fs::canonicalize(&root)?;
        let store = Arc::new(LocalFileSystem::new_with_prefix(&root)?);
        Ok(Self { store, root })
    }

    fn object_path(id: Uuid) -> Path {
        Path::from(format!("{id}/{DATA_FILE}"))
    }

    /// Directory holding the dataset; plot scripts for it run here.
    pub fn dataset_dir(&self, id: Uuid) -> PathBuf {
        self.root.join(id.to_string())
    }

    /// Creates an empty working directory for a plot without a dataset.
    pub async fn scratch_dir(&self) -> Result<ScratchDir, AppError> {
        let dir = ScratchDir {
            path: self.root.join(SCRATCH_DIR).join(Uuid::new_v4().to_string()),
        };
        tokio::fs::create_dir_all(dir.path()).await?;
        Ok(dir)
    }

    pub async fn save(&self, content: Bytes) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.store
            .put(&Self::object_path(id), PutPayload::from(content))
            .await?;
        tracing::debug!("Stored dataset {}", id);
        Ok(id)
    }

    pub async fn load(&self, id: Uuid) -> Result<Bytes, AppError> {
        let result = self
            .store
            .get(&Self::object_path(id))
            .await
            .map_err(not_found)?;
        Ok(result.bytes().await?)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        match self.store.head(&Self::object_path(id)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.exists(id).await? {
            return Err(AppError::NotFound);
        }
        self.store.delete(&Self::object_path(id)).await?;

        match tokio::fs::remove_dir_all(self.dataset_dir(id)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Temporary plot directory, deleted with its contents on drop.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

fn not_found(e: object_store::Error) -> AppError {
    match e {
        object_store::Error::NotFound { .. } => AppError::NotFound,
        e => AppError::Storage(e),
    }
}
