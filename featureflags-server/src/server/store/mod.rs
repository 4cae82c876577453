pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use featureflags::FeatureFlag;
use thiserror::Error;

pub use memory::MemoryStore;

/// Failure reported by a [`FlagRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("feature flag {0:?} already exists")]
    AlreadyExists(String),

    #[error("feature flag {0:?} not found")]
    NotFound(String),

    /// Anything not covered above, e.g. an I/O failure in a non-memory back end.
    #[allow(dead_code)]
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Keyed storage of flag definitions. Implementations must be thread-safe.
///
/// Flags are stored as given; validation happens before they get here.
/// Returned flags are shared with the store and immutable.
#[async_trait]
pub trait FlagRepository: Send + Sync {
    /// Insert a flag under a key that is not yet taken.
    async fn create(&self, flag: FeatureFlag) -> Result<(), StoreError>;

    /// Replace the flag stored under `flag.key`.
    async fn update(&self, flag: FeatureFlag) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Arc<FeatureFlag>, StoreError>;

    /// Every stored flag, in no particular order.
    async fn list(&self) -> Result<Vec<Arc<FeatureFlag>>, StoreError>;
}
