#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use listing_scout::{Area, AreaDirectory, AreaFetcher, Category, Listing};

/// In-memory fetcher standing in for the remote object store. Records every
/// fetch in call order; keys can be marked failing and healed again to
/// exercise the retry path.
pub struct MockFetcher {
    datasets: Mutex<HashMap<String, Vec<Listing>>>,
    failing: Mutex<HashSet<String>>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            datasets: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            delay,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, storage_key: &str, listings: Vec<Listing>) {
        self.datasets
            .lock()
            .unwrap()
            .insert(storage_key.to_string(), listings);
    }

    pub fn fail(&self, storage_key: &str) {
        self.failing.lock().unwrap().insert(storage_key.to_string());
    }

    pub fn heal(&self, storage_key: &str) {
        self.failing.lock().unwrap().remove(storage_key);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AreaFetcher for MockFetcher {
    async fn fetch_area_data(&self, storage_key: &str) -> Result<Vec<Listing>> {
        self.calls.lock().unwrap().push(storage_key.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.lock().unwrap().contains(storage_key) {
            anyhow::bail!("storage object {} unavailable", storage_key);
        }
        let datasets = self.datasets.lock().unwrap();
        match datasets.get(storage_key) {
            Some(listings) => Ok(listings.clone()),
            None => anyhow::bail!("storage object {} not found", storage_key),
        }
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

/// Build a small apartment-area directory; storage key is the lowercased
/// name with spaces replaced by underscores, `.json`-suffixed.
pub fn directory(names: &[&str]) -> AreaDirectory {
    let areas = names
        .iter()
        .map(|name| Area {
            name: name.to_string(),
            storage_key: storage_key(name),
            category: Category::Apartments,
        })
        .collect();
    AreaDirectory::new(areas).unwrap()
}

pub fn storage_key(name: &str) -> String {
    format!("{}.json", name.to_lowercase().replace(' ', "_"))
}

pub fn listing(title: &str, price: &str, beds: &str, property_type: &str, posted: &str) -> Listing {
    Listing {
        title: title.to_string(),
        price: price.to_string(),
        price_number: 0,
        location: "Dubai".to_string(),
        property_type: property_type.to_string(),
        beds: format!("{} Beds", beds),
        bedroom_count: beds.to_string(),
        size: "1,000 sqft".to_string(),
        link: "https://example.com/listing/1".to_string(),
        building_url: "https://example.com/buildings/marina-gate/1".to_string(),
        posted_date: posted.to_string(),
        price_per_sqft: None,
    }
}
