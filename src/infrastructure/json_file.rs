use crate::domain::creator::Creator;
use crate::domain::ports::CatalogSource;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A creator catalog backed by a JSON file holding an array of creators.
///
/// The file is read on every call, so edits are picked up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    /// Points the catalog at `path`. Fails if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        // Surface a missing file at startup rather than on the first query.
        std::fs::metadata(&path)?;
        Ok(Self { path })
    }

    async fn load(&self) -> Result<Vec<Creator>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let creators: Vec<Creator> = serde_json::from_str(&raw)?;
        tracing::debug!(path = %self.path.display(), count = creators.len(), "catalog loaded");
        Ok(creators)
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn all(&self) -> Result<Vec<Creator>> {
        self.load().await
    }

    async fn get(&self, creator_id: &str) -> Result<Option<Creator>> {
        Ok(self.load().await?.into_iter().find(|c| c.id == creator_id))
    }
}
