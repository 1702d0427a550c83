//! Location lookup: cached fix first, device query otherwise.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use carefinder_core::{EventBus, Fix, Notification, PermissionState};

use crate::cache::LocationCache;
use crate::device::{DeviceLocator, DeviceQuery};
use crate::error::LocateError;
use crate::store::KeyValueStore;

/// Per-call options for [`LocationProvider::get_location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    pub use_cached: bool,
    /// Skip the cache even when `use_cached` is set.
    pub force_fresh: bool,
    pub max_age_ms: u64,
    pub high_accuracy: bool,
    pub timeout_ms: u64,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            use_cached: true,
            force_fresh: false,
            max_age_ms: 3_600_000,
            high_accuracy: true,
            timeout_ms: 10_000,
        }
    }
}

/// Resolves the user's location, preferring a fresh cached fix.
///
/// Each call that misses the cache issues its own device query; concurrent
/// callers are not coalesced.
pub struct LocationProvider<D, S> {
    device: D,
    cache: LocationCache<S>,
    bus: EventBus,
    last_permission: Mutex<Option<PermissionState>>,
}

impl<D, S> LocationProvider<D, S>
where
    D: DeviceLocator,
    S: KeyValueStore,
{
    pub fn new(device: D, store: S, bus: EventBus) -> Self {
        Self {
            device,
            cache: LocationCache::new(store, bus.clone()),
            bus,
            last_permission: Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &LocationCache<S> {
        &self.cache
    }

    /// Returns a fix from the cache or the device.
    ///
    /// A device fix is persisted before it is returned. Every outcome is also
    /// published on the bus as `LocationUpdated` or `LocationError`.
    ///
    /// # Errors
    ///
    /// - [`LocateError::Unsupported`] if the device has no location capability.
    /// - [`LocateError::Timeout`] if the device does not answer within `timeout_ms`.
    /// - Any error the device reports (`PermissionDenied`, `PositionUnavailable`, `Unknown`).
    pub async fn get_location(&self, options: &LocateOptions) -> Result<Fix, LocateError> {
        if !self.device.is_supported() {
            return Err(self.fail(LocateError::Unsupported));
        }

        if options.use_cached && !options.force_fresh {
            if let Some(fix) = self.cache.read(options.max_age_ms) {
                tracing::debug!(timestamp = fix.timestamp, "using cached location");
                self.bus.publish(Notification::LocationUpdated { fix });
                return Ok(fix);
            }
        }

        let query = DeviceQuery {
            high_accuracy: options.high_accuracy,
            timeout_ms: options.timeout_ms,
            max_age_ms: options.max_age_ms,
        };
        let timeout = Duration::from_millis(options.timeout_ms);
        let position = match tokio::time::timeout(timeout, self.device.current_position(query)).await
        {
            Ok(Ok(position)) => position,
            Ok(Err(e)) => return Err(self.fail(e)),
            Err(_) => {
                return Err(self.fail(LocateError::Timeout {
                    timeout_ms: options.timeout_ms,
                }))
            }
        };

        let fix = Fix {
            latitude: position.coordinate.latitude,
            longitude: position.coordinate.longitude,
            accuracy: position.accuracy,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.cache.save(&fix);
        tracing::info!(
            latitude = fix.latitude,
            longitude = fix.longitude,
            accuracy = fix.accuracy,
            "obtained device location"
        );
        self.bus.publish(Notification::LocationUpdated { fix });
        Ok(fix)
    }

    /// Drops the cached fix and asks the device for a new one.
    ///
    /// # Errors
    ///
    /// Same as [`LocationProvider::get_location`].
    pub async fn refresh(&self, options: &LocateOptions) -> Result<Fix, LocateError> {
        self.cache.clear();
        let options = LocateOptions {
            force_fresh: true,
            ..*options
        };
        self.get_location(&options).await
    }

    /// Reports the device permission state, publishing `PermissionChanged`
    /// whenever it differs from the last state observed.
    pub async fn check_permission(&self) -> PermissionState {
        let state = if self.device.is_supported() {
            self.device.permission().await
        } else {
            PermissionState::Unknown
        };

        let changed = {
            let mut last = self
                .last_permission
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let changed = last.is_some_and(|prev| prev != state);
            *last = Some(state);
            changed
        };
        if changed {
            self.bus
                .publish(Notification::PermissionChanged { state });
        }
        state
    }

    fn fail(&self, error: LocateError) -> LocateError {
        tracing::warn!(kind = %error.kind(), error = %error, "location request failed");
        self.bus.publish(Notification::LocationError {
            kind: error.kind(),
            message: error.to_string(),
        });
        error
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
