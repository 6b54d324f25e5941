use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Area, Category, Listing};

/// Static registry of known areas. Read-only for the life of the process;
/// registry order determines background-sweep order.
pub struct AreaDirectory {
    areas: Vec<Area>,
}

impl AreaDirectory {
    /// Build a directory from an ordered area list. Duplicate names
    /// (case-insensitive) are rejected.
    pub fn new(areas: Vec<Area>) -> Result<Self> {
        let mut seen: Vec<String> = Vec::with_capacity(areas.len());
        for area in &areas {
            let lower = area.name.to_lowercase();
            if seen.contains(&lower) {
                anyhow::bail!("Duplicate area name in registry: {}", area.name);
            }
            seen.push(lower);
        }
        Ok(Self { areas })
    }

    /// The built-in Dubai registry
    pub fn dubai() -> Self {
        let areas = [
            // Villas / townhouses
            ("Al Barari", "albarari_total.json", Category::Villas),
            ("Damac Lagoons", "damac_lagoons_total.json", Category::Villas),
            ("Damac Hills", "damac_hills_total.json", Category::Villas),
            ("Palm Jumeirah", "Palm_Jumeirah_total.json", Category::Townhouses),
            ("Villanova", "villanova.json", Category::Townhouses),
            ("Tilal Al Ghaf", "tilal_al_ghaf.json", Category::Townhouses),
            ("The Villa", "the_villa.json", Category::Villas),
            ("Jumeirah Park", "Jumeirah_park.json", Category::Townhouses),
            ("The Springs", "the_springs.json", Category::Townhouses),
            // Apartments
            ("Al Jaddaf", "al_jaddaf_total.json", Category::Apartments),
            ("Downtown Dubai", "downtown_dubai_total.json", Category::Apartments),
            ("Business Bay", "business_bay.json", Category::Apartments),
            ("Al Kifaf", "al_kifaf.json", Category::Apartments),
            ("Dubai Marina", "dubai_marina.json", Category::Apartments),
            ("DIFC", "difc.json", Category::Apartments),
            ("Jumeirah Garden City", "jumeirah_garden_city.json", Category::Apartments),
            ("District One Residences", "district_one_residences.json", Category::Apartments),
        ]
        .into_iter()
        .map(|(name, key, category)| Area {
            name: name.to_string(),
            storage_key: key.to_string(),
            category,
        })
        .collect();

        Self::new(areas).expect("built-in registry contains duplicate area names")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Exact case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&Area> {
        self.areas
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn by_category(&self, category: Category) -> Vec<&Area> {
        self.areas
            .iter()
            .filter(|a| a.category == category)
            .collect()
    }

    /// Resolve a free-text token to an area: exact match first, then
    /// substring containment in either direction, then acronym match on the
    /// initials of the area name ("jvc" resolves "Jumeirah Village Circle").
    pub fn resolve_token(&self, token: &str) -> Option<&Area> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }

        if let Some(area) = self.find(&token) {
            return Some(area);
        }

        if let Some(area) = self.areas.iter().find(|a| {
            let name = a.name.to_lowercase();
            name.contains(&token) || token.contains(&name)
        }) {
            return Some(area);
        }

        self.areas.iter().find(|a| acronym(&a.name) == token)
    }
}

fn acronym(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_lowercase()
}

/// Per-area cache entry with summary fields computed at load time.
/// Never mutated after creation; only whole-entry replacement on a reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub area_name: String,
    pub listings: Vec<Listing>,
    pub last_updated: DateTime<Utc>,
    pub total_listings: usize,
    /// Undefined for an empty listing set
    pub lowest_price: Option<u64>,
    pub average_price: Option<u64>,
}

/// In-memory session cache of loaded areas, keyed by area name, iterated in
/// insertion order. No eviction; single-flight loading makes concurrent
/// writers impossible by construction.
#[derive(Default)]
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, area_name: &str) -> bool {
        self.index.contains_key(area_name)
    }

    pub fn get(&self, area_name: &str) -> Option<&CatalogEntry> {
        self.index.get(area_name).map(|&i| &self.entries[i])
    }

    /// Insert the loaded listing set for an area, computing its summary
    /// fields. An empty listing set is a valid, summary-less entry.
    pub fn put(&mut self, area_name: &str, listings: Vec<Listing>) -> &CatalogEntry {
        let total_listings = listings.len();
        let (lowest_price, average_price) = if listings.is_empty() {
            (None, None)
        } else {
            let prices: Vec<u64> = listings.iter().map(|l| l.numeric_price()).collect();
            let lowest = prices.iter().copied().min();
            let sum: u64 = prices.iter().sum();
            let average = (sum as f64 / prices.len() as f64).round() as u64;
            (lowest, Some(average))
        };

        let entry = CatalogEntry {
            area_name: area_name.to_string(),
            listings,
            last_updated: Utc::now(),
            total_listings,
            lowest_price,
            average_price,
        };

        match self.index.get(area_name) {
            Some(&i) => {
                self.entries[i] = entry;
                &self.entries[i]
            }
            None => {
                let idx = self.entries.len();
                self.index.insert(area_name.to_string(), idx);
                self.entries.push(entry);
                &self.entries[idx]
            }
        }
    }

    /// All entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Consistent copy of the current listing set: one area's listings when
    /// selected, otherwise the union of every loaded area in insertion order.
    pub fn snapshot(&self, selected_area: Option<&str>) -> Vec<Listing> {
        match selected_area {
            Some(name) => self
                .get(name)
                .map(|e| e.listings.clone())
                .unwrap_or_default(),
            None => self
                .entries
                .iter()
                .flat_map(|e| e.listings.iter().cloned())
                .collect(),
        }
    }

    /// Aggregate statistics over the loaded areas
    pub fn summary(&self, total_areas: usize) -> SummaryStats {
        let total_listings = self.entries.iter().map(|e| e.total_listings).sum();
        let last_updated = self.entries.iter().map(|e| e.last_updated).max();

        let averages: Vec<u64> = self
            .entries
            .iter()
            .filter_map(|e| e.average_price)
            .collect();
        let average_price = if averages.is_empty() {
            None
        } else {
            let sum: u64 = averages.iter().sum();
            Some((sum as f64 / averages.len() as f64).round() as u64)
        };

        SummaryStats {
            total_areas,
            loaded_areas: self.entries.len(),
            total_listings,
            average_price,
            last_updated,
        }
    }
}

/// Aggregate view over every loaded area, for the stats display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_areas: usize,
    pub loaded_areas: usize,
    pub total_listings: usize,
    /// Mean of the per-area average prices; `None` until something loads
    pub average_price: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}
