//! Storage of regions the resolver searches in.

use std::convert::Infallible;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::region::Region;

/// Source of the regions known to the application.
///
/// Implementations decide where regions live. The resolver only reads the full set through
/// [`RegionStore::fetch_all`] and returns the store's errors unchanged.
#[async_trait]
pub trait RegionStore: Send + Sync {
    /// Error type of the store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns all stored regions.
    async fn fetch_all(&self) -> Result<Vec<Region>, Self::Error>;
    /// Adds a region to the store.
    async fn insert(&self, region: Region) -> Result<(), Self::Error>;
    /// Removes all regions from the store.
    async fn delete_all(&self) -> Result<(), Self::Error>;
}

/// Region store keeping regions in memory.
#[derive(Debug, Default)]
pub struct MemoryRegionStore {
    regions: RwLock<Vec<Region>>,
}

impl MemoryRegionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store containing the given regions.
    pub fn with_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: RwLock::new(regions.into_iter().collect()),
        }
    }

    /// Number of stored regions.
    pub fn len(&self) -> usize {
        self.regions.read().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.regions.read().is_empty()
    }
}

#[async_trait]
impl RegionStore for MemoryRegionStore {
    type Error = Infallible;

    async fn fetch_all(&self) -> Result<Vec<Region>, Self::Error> {
        Ok(self.regions.read().clone())
    }

    async fn insert(&self, region: Region) -> Result<(), Self::Error> {
        self.regions.write().push(region);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), Self::Error> {
        self.regions.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionKind;

    #[test]
    fn insert_and_clear() {
        let store = MemoryRegionStore::new();
        tokio_test::block_on(async {
            store
                .insert(Region::new(RegionKind::Building).with_uid("b"))
                .await
                .expect("infallible");
            store
                .insert(Region::new(RegionKind::Floor).with_uid("f"))
                .await
                .expect("infallible");

            let regions = store.fetch_all().await.expect("infallible");
            assert_eq!(regions.len(), 2);
            assert_eq!(regions[0].uid(), "b");

            store.delete_all().await.expect("infallible");
            assert!(store.is_empty());
        });
    }
}
