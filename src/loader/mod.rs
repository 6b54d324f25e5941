use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::{AreaDirectory, CatalogEntry, CatalogStore, SummaryStats};
use crate::fetch::AreaFetcher;
use crate::models::{Area, Listing};

/// Per-area load lifecycle. A failed load goes back to `Unloaded` so the
/// area stays retryable; it never poisons the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

/// Orchestrates fetching per-area datasets into the catalog store.
///
/// Two request modes: a foreground load of one named area (owns the shared
/// loading indicator, surfaces its error) and a background sweep over every
/// not-yet-loaded area in registry order (indicator untouched, failures only
/// logged). A foreground request cancels any in-flight sweep before starting;
/// cancellation is cooperative and checked before each per-area fetch, never
/// aborting a fetch already under way.
///
/// Cloning produces another handle to the same scheduler.
#[derive(Clone)]
pub struct LoadScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    directory: Arc<AreaDirectory>,
    fetcher: Arc<dyn AreaFetcher>,
    store: Mutex<CatalogStore>,
    states: Mutex<HashMap<String, LoadState>>,
    loading: AtomicBool,
    last_error: Mutex<Option<String>>,
    sweep_token: Mutex<CancellationToken>,
}

impl LoadScheduler {
    pub fn new(directory: Arc<AreaDirectory>, fetcher: Arc<dyn AreaFetcher>) -> Self {
        Self {
            inner: Arc::new(Inner {
                directory,
                fetcher,
                store: Mutex::new(CatalogStore::new()),
                states: Mutex::new(HashMap::new()),
                loading: AtomicBool::new(false),
                last_error: Mutex::new(None),
                sweep_token: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    pub fn directory(&self) -> &AreaDirectory {
        &self.inner.directory
    }

    /// Whether a foreground load is currently in flight
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// Message of the most recent foreground failure, naming the area
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.lock().unwrap().clone()
    }

    pub fn state_of(&self, area_name: &str) -> LoadState {
        self.inner
            .states
            .lock()
            .unwrap()
            .get(area_name)
            .copied()
            .unwrap_or(LoadState::Unloaded)
    }

    pub fn is_loaded(&self, area_name: &str) -> bool {
        self.state_of(area_name) == LoadState::Loaded
    }

    /// Consistent copy of the current listing set (one area, or the union of
    /// everything loaded so far)
    pub fn snapshot(&self, selected_area: Option<&str>) -> Vec<Listing> {
        self.inner.store.lock().unwrap().snapshot(selected_area)
    }

    pub fn entry(&self, area_name: &str) -> Option<CatalogEntry> {
        self.inner.store.lock().unwrap().get(area_name).cloned()
    }

    pub fn summary(&self) -> SummaryStats {
        self.inner
            .store
            .lock()
            .unwrap()
            .summary(self.inner.directory.len())
    }

    /// Signal cancellation of any in-flight background sweep. The sweep
    /// finishes its current fetch and stops before the next one.
    pub fn cancel_background(&self) {
        self.inner.sweep_token.lock().unwrap().cancel();
    }

    fn set_state(&self, area_name: &str, state: LoadState) {
        self.inner
            .states
            .lock()
            .unwrap()
            .insert(area_name.to_string(), state);
    }

    /// Atomically claim an area for loading. The state check and the
    /// `Loading` transition happen under one lock, so a foreground load and
    /// the sweep can never both claim the same area.
    fn try_begin_load(&self, area_name: &str) -> bool {
        let mut states = self.inner.states.lock().unwrap();
        match states.get(area_name) {
            Some(LoadState::Loading) | Some(LoadState::Loaded) => false,
            _ => {
                states.insert(area_name.to_string(), LoadState::Loading);
                true
            }
        }
    }

    /// Foreground load of one named area. Returns immediately when the area
    /// is already loaded or in flight (without waiting for in-flight data to
    /// land); otherwise cancels the background sweep, raises the loading
    /// indicator and surfaces any failure to the caller.
    pub async fn load_area(&self, area_name: &str) -> Result<()> {
        let area = match self.inner.directory.find(area_name) {
            Some(area) => area.clone(),
            None => {
                let message = format!("Failed to load data for {}: unknown area", area_name);
                *self.inner.last_error.lock().unwrap() = Some(message.clone());
                anyhow::bail!(message);
            }
        };

        if !self.try_begin_load(&area.name) {
            return Ok(());
        }

        // The sweep must not compete for the shared loading indicator
        self.cancel_background();

        self.inner.loading.store(true, Ordering::SeqCst);
        *self.inner.last_error.lock().unwrap() = None;

        info!("Loading area {}", area.name);
        let result = self.fetch_into_store(&area).await;
        self.inner.loading.store(false, Ordering::SeqCst);

        if let Err(err) = result {
            let message = format!("Failed to load data for {}", area.name);
            *self.inner.last_error.lock().unwrap() = Some(message.clone());
            warn!("{}: {:#}", message, err);
            return Err(err.context(message));
        }
        Ok(())
    }

    /// Foreground-select an area, then restart the sweep so every remaining
    /// area still gets loaded behind the user's current focus
    pub async fn select_area(&self, area_name: &str) -> Result<()> {
        let result = self.load_area(area_name).await;
        self.start_background_sweep();
        result
    }

    /// Start a fresh background sweep over all not-yet-loaded areas,
    /// invalidating any sweep already in flight
    pub fn start_background_sweep(&self) -> JoinHandle<()> {
        let token = {
            let mut guard = self.inner.sweep_token.lock().unwrap();
            guard.cancel();
            *guard = CancellationToken::new();
            guard.clone()
        };
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.run_sweep(token).await })
    }

    async fn run_sweep(&self, token: CancellationToken) {
        debug!("Background sweep started");
        for area in self.inner.directory.iter() {
            if token.is_cancelled() {
                debug!("Background sweep cancelled before {}", area.name);
                return;
            }
            if !self.try_begin_load(&area.name) {
                continue;
            }

            match self.fetch_into_store(area).await {
                Ok(()) => debug!("Background-loaded {}", area.name),
                Err(err) => {
                    // Never surfaced; the area stays retryable
                    warn!("Background load of {} failed: {:#}", area.name, err);
                }
            }
        }
        debug!("Background sweep finished");
    }

    async fn fetch_into_store(&self, area: &Area) -> Result<()> {
        match self.inner.fetcher.fetch_area_data(&area.storage_key).await {
            Ok(listings) => {
                self.inner.store.lock().unwrap().put(&area.name, listings);
                self.set_state(&area.name, LoadState::Loaded);
                Ok(())
            }
            Err(err) => {
                self.set_state(&area.name, LoadState::Unloaded);
                Err(err)
            }
        }
    }
}
