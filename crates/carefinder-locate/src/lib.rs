//! Device location with a persisted, max-age-checked cache in front of it.

pub mod cache;
pub mod device;
pub mod error;
pub mod provider;
pub mod store;

pub use cache::{LocationCache, LOCATION_STORAGE_KEY};
pub use device::{DeviceLocator, DeviceQuery, FixedLocator, Position, UnsupportedLocator};
pub use error::{CacheError, LocateError, StoreError};
pub use provider::{LocateOptions, LocationProvider};
pub use store::{FileStore, KeyValueStore, MemoryStore};
