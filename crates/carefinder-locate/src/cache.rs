//! The single persisted location record.
//!
//! The cache owns one key in the backing store. Reads never fail: an absent,
//! stale, unreadable, or malformed record is a miss. Writes that the store
//! rejects are logged and dropped.

use carefinder_core::{EventBus, Fix, Notification};

use crate::error::CacheError;
use crate::store::KeyValueStore;

/// Storage key holding the JSON `{latitude, longitude, accuracy, timestamp}` record.
pub const LOCATION_STORAGE_KEY: &str = "ai_therapist_user_location";

pub struct LocationCache<S> {
    store: S,
    bus: EventBus,
}

impl<S: KeyValueStore> LocationCache<S> {
    pub fn new(store: S, bus: EventBus) -> Self {
        Self { store, bus }
    }

    /// Persists `fix`, replacing any previous record.
    ///
    /// Emits [`Notification::LocationSaved`] on success. A rejected write
    /// (quota, I/O) is logged and otherwise ignored.
    pub fn save(&self, fix: &Fix) {
        let body = match serde_json::to_string(fix) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize location fix");
                return;
            }
        };
        match self.store.set(LOCATION_STORAGE_KEY, &body) {
            Ok(()) => {
                tracing::debug!(timestamp = fix.timestamp, "location saved");
                self.bus.publish(Notification::LocationSaved { fix: *fix });
            }
            Err(e) => tracing::warn!(error = %e, "failed to persist location"),
        }
    }

    /// Returns the cached fix if it is younger than `max_age_ms`.
    pub fn read(&self, max_age_ms: u64) -> Option<Fix> {
        self.read_at(max_age_ms, chrono::Utc::now().timestamp_millis())
    }

    /// Same as [`LocationCache::read`] with an explicit clock.
    ///
    /// A record exactly `max_age_ms` old is already stale.
    pub fn read_at(&self, max_age_ms: u64, now_ms: i64) -> Option<Fix> {
        let fix = match self.try_load() {
            Ok(Some(fix)) => fix,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable cached location");
                return None;
            }
        };

        let age_ms = i128::from(now_ms) - i128::from(fix.timestamp);
        if age_ms < i128::from(max_age_ms) {
            Some(fix)
        } else {
            tracing::debug!(age_ms = %age_ms, max_age_ms, "cached location is stale");
            None
        }
    }

    /// Removes the cached record and emits [`Notification::LocationCleared`].
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(LOCATION_STORAGE_KEY) {
            tracing::warn!(error = %e, "failed to clear cached location");
        }
        self.bus.publish(Notification::LocationCleared);
    }

    fn try_load(&self) -> Result<Option<Fix>, CacheError> {
        let Some(raw) = self.store.get(LOCATION_STORAGE_KEY)? else {
            return Ok(None);
        };
        let fix: Fix = serde_json::from_str(&raw)?;
        if fix.timestamp <= 0 {
            // A zero or negative timestamp never counts as fresh.
            return Ok(None);
        }
        Ok(Some(fix))
    }
}
