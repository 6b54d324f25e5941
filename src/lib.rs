//! Area-partitioned real-estate catalog: lazy per-area loading with a
//! prioritized, cancelable background sweep, free-text query interpretation
//! into structured filters, and a filter/sort pipeline over the loaded set.

pub mod catalog;
pub mod fetch;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod session;

pub use catalog::{AreaDirectory, CatalogEntry, CatalogStore, SummaryStats};
pub use fetch::{AreaFetcher, StorageFetcher};
pub use loader::{LoadScheduler, LoadState};
pub use models::{Area, Category, Listing};
pub use query::{CategoryFilter, DateFilter, DateSort, FilterSpec, PriceSort, QueryInterpreter};
pub use session::Session;
