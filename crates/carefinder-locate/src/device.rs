//! The device location capability, abstracted.

use std::future::Future;

use carefinder_core::{Coordinate, PermissionState};

use crate::error::LocateError;

/// Parameters handed to the device for one position query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceQuery {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    /// Oldest device-side cached reading the device may answer with.
    pub max_age_ms: u64,
}

/// A raw reading from the device, before it is timestamped and cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coordinate: Coordinate,
    /// Radius of uncertainty in metres.
    pub accuracy: f64,
}

/// Something that can report where the user is.
pub trait DeviceLocator: Send + Sync {
    /// Whether the device has any location capability at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Queries the current position once.
    fn current_position(
        &self,
        query: DeviceQuery,
    ) -> impl Future<Output = Result<Position, LocateError>> + Send;

    /// Current permission state for location access.
    fn permission(&self) -> impl Future<Output = PermissionState> + Send {
        async { PermissionState::Unknown }
    }
}

/// A locator answering with a manually entered position.
///
/// Built without a position it behaves like a device that cannot get a fix.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    position: Option<Position>,
}

impl FixedLocator {
    #[must_use]
    pub fn new(coordinate: Coordinate, accuracy: f64) -> Self {
        Self {
            position: Some(Position {
                coordinate,
                accuracy,
            }),
        }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl DeviceLocator for FixedLocator {
    fn current_position(
        &self,
        _query: DeviceQuery,
    ) -> impl Future<Output = Result<Position, LocateError>> + Send {
        let result = self
            .position
            .ok_or_else(|| LocateError::PositionUnavailable("no position was provided".into()));
        async move { result }
    }

    fn permission(&self) -> impl Future<Output = PermissionState> + Send {
        async { PermissionState::Granted }
    }
}

/// A host with no location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocator;

impl DeviceLocator for UnsupportedLocator {
    fn is_supported(&self) -> bool {
        false
    }

    fn current_position(
        &self,
        _query: DeviceQuery,
    ) -> impl Future<Output = Result<Position, LocateError>> + Send {
        async { Err(LocateError::Unsupported) }
    }
}
