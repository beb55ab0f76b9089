//! Local caching module.
//!
//! `KvStore` is a small file-backed key-value store; `CacheManager` keeps the
//! board's `AirlineList` in it under the `airlineData` key. The cache entry
//! outlives the running board and is read back on the next start.

pub mod manager;
pub mod store;

pub use manager::{age_display, CacheManager, AIRLINE_DATA_KEY};
pub use store::KvStore;
