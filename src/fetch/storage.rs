use crate::fetch::traits::AreaFetcher;
use crate::models::Listing;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetcher for per-area JSON datasets published in an object-storage bucket
pub struct StorageFetcher {
    client: Client,
    base_url: String,
    bucket: String,
}

impl StorageFetcher {
    /// Create a fetcher for the given storage endpoint and bucket
    pub fn new(base_url: &str, bucket: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("listing-scout/0.1")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        })
    }

    /// Public object URL with a cache-busting timestamp parameter, so a
    /// refreshed dataset is never hidden behind an intermediary cache
    fn object_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}?t={}",
            self.base_url,
            self.bucket,
            storage_key,
            Utc::now().timestamp_millis()
        )
    }
}

#[async_trait]
impl AreaFetcher for StorageFetcher {
    async fn fetch_area_data(&self, storage_key: &str) -> Result<Vec<Listing>> {
        let url = self.object_url(storage_key);
        debug!("Fetching area dataset: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch dataset {}", storage_key))?;

        if !response.status().is_success() {
            warn!("Storage returned status {} for {}", response.status(), storage_key);
            anyhow::bail!(
                "Failed to fetch dataset {}: {}",
                storage_key,
                response.status()
            );
        }

        let listings: Vec<Listing> = response
            .json()
            .await
            .with_context(|| format!("Dataset {} is not a well-formed listing array", storage_key))?;

        debug!("Fetched {} listings from {}", listings.len(), storage_key);
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "object-storage"
    }
}
