use crate::domain::creator::Creator;
use crate::domain::ports::CatalogSource;
use crate::error::Result;
use crate::infrastructure::seed::Seed;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory creator catalog.
///
/// Uses `Arc<RwLock<Vec<Creator>>>` so clones share one catalog. Insertion
/// order is preserved, which is the order the query engine falls back to for
/// equal sort keys.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    creators: Arc<RwLock<Vec<Creator>>>,
}

impl InMemoryCatalog {
    /// Creates a catalog holding the given creators.
    pub fn new(creators: Vec<Creator>) -> Self {
        Self {
            creators: Arc::new(RwLock::new(creators)),
        }
    }

    /// Creates a catalog from the bundled demo fixture.
    pub fn seeded() -> Result<Self> {
        Ok(Self::new(Seed::bundled()?.creators))
    }

    /// Adds a creator, replacing any existing entry with the same id.
    pub async fn upsert(&self, creator: Creator) {
        let mut creators = self.creators.write().await;
        match creators.iter_mut().find(|c| c.id == creator.id) {
            Some(existing) => *existing = creator,
            None => creators.push(creator),
        }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn all(&self) -> Result<Vec<Creator>> {
        let creators = self.creators.read().await;
        Ok(creators.clone())
    }

    async fn get(&self, creator_id: &str) -> Result<Option<Creator>> {
        let creators = self.creators.read().await;
        Ok(creators.iter().find(|c| c.id == creator_id).cloned())
    }
}
