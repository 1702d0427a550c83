//! Process-wide notification bus.
//!
//! Components publish [`Notification`]s so unrelated UI (permission banners,
//! status lines) can react without being wired to the publisher. The bus does
//! not track subscribers; publishing into a bus nobody listens to is a no-op.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::geo::Fix;

const DEFAULT_CAPACITY: usize = 64;

/// Device-location failure kinds, shared by the locator and its listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationErrorKind {
    Unsupported,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl std::fmt::Display for LocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unsupported => "unsupported",
            Self::PermissionDenied => "permission_denied",
            Self::PositionUnavailable => "position_unavailable",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    LocationUpdated {
        fix: Fix,
    },
    LocationError {
        kind: LocationErrorKind,
        message: String,
    },
    LocationSaved {
        fix: Fix,
    },
    LocationCleared,
    PermissionChanged {
        state: PermissionState,
    },
    SearchLoading {
        query_key: String,
    },
    SearchSuccess {
        query_key: String,
        count: usize,
        /// `true` when the results are sample data rather than a real match.
        fallback: bool,
    },
    SearchError {
        query_key: String,
        message: String,
    },
}

impl Notification {
    /// Stable event name, e.g. `"location_saved"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocationUpdated { .. } => "location_updated",
            Self::LocationError { .. } => "location_error",
            Self::LocationSaved { .. } => "location_saved",
            Self::LocationCleared => "location_cleared",
            Self::PermissionChanged { .. } => "permission_changed",
            Self::SearchLoading { .. } => "search_loading",
            Self::SearchSuccess { .. } => "search_success",
            Self::SearchError { .. } => "search_error",
        }
    }
}

/// Cheaply cloneable handle onto one broadcast channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Notification>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus that buffers up to `capacity` notifications per lagging subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, notification: Notification) {
        tracing::debug!(event = notification.name(), "publishing notification");
        // Err only means there are no subscribers right now.
        let _ = self.sender.send(notification);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}
