use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for remote listing sources
/// This allows swapping the storage backend, and mock fetchers in tests
#[async_trait]
pub trait AreaFetcher: Send + Sync {
    /// Fetch the raw listing array stored under `storage_key`
    async fn fetch_area_data(&self, storage_key: &str) -> Result<Vec<Listing>>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
