use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use featureflags::FeatureFlag;
use tokio::sync::RwLock;

use super::{FlagRepository, StoreError};

/// In-memory flag storage backed by a `RwLock<HashMap>`.
///
/// Writers hold the lock across the existence check and the mutation, so two
/// racing creates of the same key cannot both succeed.
#[derive(Default)]
pub struct MemoryStore {
    flags: RwLock<HashMap<String, Arc<FeatureFlag>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.flags.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.flags.read().await.is_empty()
    }
}

#[async_trait]
impl FlagRepository for MemoryStore {
    async fn create(&self, flag: FeatureFlag) -> Result<(), StoreError> {
        let mut flags = self.flags.write().await;
        match flags.entry(flag.key.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(flag.key)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(flag));
                Ok(())
            }
        }
    }

    async fn update(&self, flag: FeatureFlag) -> Result<(), StoreError> {
        let mut flags = self.flags.write().await;
        match flags.get_mut(&flag.key) {
            Some(stored) => {
                *stored = Arc::new(flag);
                Ok(())
            }
            None => Err(StoreError::NotFound(flag.key)),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut flags = self.flags.write().await;
        flags
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn get(&self, key: &str) -> Result<Arc<FeatureFlag>, StoreError> {
        let flags = self.flags.read().await;
        flags
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn list(&self) -> Result<Vec<Arc<FeatureFlag>>, StoreError> {
        let flags = self.flags.read().await;
        Ok(flags.values().cloned().collect())
    }
}
