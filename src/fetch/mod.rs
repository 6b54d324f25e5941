pub mod storage;
pub mod traits;

pub use storage::StorageFetcher;
pub use traits::AreaFetcher;
