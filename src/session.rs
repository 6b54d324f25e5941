use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use tokio::task::JoinHandle;
use tracing::info;

use crate::catalog::{AreaDirectory, CatalogEntry, SummaryStats};
use crate::fetch::AreaFetcher;
use crate::loader::LoadScheduler;
use crate::models::{Area, Category, Listing};
use crate::pipeline;
use crate::query::{CategoryFilter, FilterSpec, QueryInterpreter};

/// One browsing session: the current area selection and filter specification,
/// wired through the query interpreter, the load scheduler and the
/// filter/sort pipeline.
pub struct Session {
    scheduler: LoadScheduler,
    interpreter: QueryInterpreter,
    filters: FilterSpec,
}

impl Session {
    pub fn new(directory: AreaDirectory, fetcher: Arc<dyn AreaFetcher>) -> Self {
        let directory = Arc::new(directory);
        let scheduler = LoadScheduler::new(Arc::clone(&directory), fetcher);
        let interpreter = QueryInterpreter::new(directory);
        Self {
            scheduler,
            interpreter,
            filters: FilterSpec::default(),
        }
    }

    pub fn scheduler(&self) -> &LoadScheduler {
        &self.scheduler
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    /// Replace the whole filter specification (direct UI mutation path)
    pub fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
    }

    /// Select an area by name: foreground-loads it and restarts the
    /// background sweep over the remaining areas. When the sweep already has
    /// this area's fetch in flight the load returns before the data lands,
    /// so an immediate `results()` can still be empty until it does.
    pub async fn select_area(&mut self, area_name: &str) -> Result<()> {
        let area = self.scheduler.directory().find(area_name).cloned();
        match area {
            Some(area) => {
                // the villa/townhouse subtype control only applies to
                // villa/townhouse areas
                if !matches!(area.category, Category::Villas | Category::Townhouses)
                    && matches!(
                        self.filters.category,
                        CategoryFilter::Villas | CategoryFilter::Townhouses
                    )
                {
                    self.filters.category = CategoryFilter::All;
                }
                self.filters.area = Some(area.name.clone());
                self.scheduler.select_area(&area.name).await
            }
            None => {
                // the unknown name stays selected on purpose: results show
                // the empty area the user asked for, next to the error,
                // instead of silently falling back to all areas
                self.filters.area = Some(area_name.to_string());
                self.scheduler.select_area(area_name).await
            }
        }
    }

    /// Drop the area selection; results become the union of loaded areas
    pub fn clear_selection(&mut self) {
        self.filters.area = None;
    }

    /// Interpret a free-text query. The resulting specification replaces the
    /// current filters wholesale, so anything the text does not mention is
    /// cleared. A resolved area token becomes an implicit area selection;
    /// otherwise the query searches across every area and the sweep is
    /// (re)started so the aggregate eventually covers the whole registry.
    pub async fn search(&mut self, text: &str) -> Result<()> {
        let spec = self
            .interpreter
            .interpret(text, Local::now().date_naive());
        info!("Interpreted query {:?} -> {:?}", text, spec);
        self.filters = spec;

        match self.filters.area.clone() {
            Some(area) => self.scheduler.select_area(&area).await,
            None => {
                self.scheduler.start_background_sweep();
                Ok(())
            }
        }
    }

    /// Ordered result of the pipeline over a consistent snapshot of the
    /// currently loaded areas
    pub fn results(&self) -> Vec<Listing> {
        let snapshot = self.scheduler.snapshot(self.filters.area.as_deref());
        pipeline::run(&snapshot, &self.filters, Local::now().naive_local())
    }

    /// Areas selectable under a category filter, in registry order
    pub fn selectable_areas(&self, filter: CategoryFilter) -> Vec<Area> {
        self.scheduler
            .directory()
            .iter()
            .filter(|a| match filter {
                CategoryFilter::All => true,
                CategoryFilter::Apartments => a.category == Category::Apartments,
                CategoryFilter::Villas => a.category == Category::Villas,
                CategoryFilter::Townhouses => a.category == Category::Townhouses,
                CategoryFilter::VillaTownhouse => {
                    matches!(a.category, Category::Villas | Category::Townhouses)
                }
            })
            .cloned()
            .collect()
    }

    /// Distinct normalized bedroom counts present in the current listing
    /// set, sorted ascending (filter dropdown options)
    pub fn bedroom_options(&self) -> Vec<u32> {
        let snapshot = self.scheduler.snapshot(self.filters.area.as_deref());
        let mut options: Vec<u32> = snapshot.iter().filter_map(|l| l.bedrooms()).collect();
        options.sort_unstable();
        options.dedup();
        options
    }

    pub fn start_background_sweep(&self) -> JoinHandle<()> {
        self.scheduler.start_background_sweep()
    }

    pub fn is_loading(&self) -> bool {
        self.scheduler.is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.scheduler.last_error()
    }

    pub fn area_entry(&self, area_name: &str) -> Option<CatalogEntry> {
        self.scheduler.entry(area_name)
    }

    pub fn summary(&self) -> SummaryStats {
        self.scheduler.summary()
    }
}
