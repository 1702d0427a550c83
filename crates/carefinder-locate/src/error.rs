use carefinder_core::LocationErrorKind;
use thiserror::Error;

/// Failures from a device location query.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocateError {
    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("location request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("location error: {0}")]
    Unknown(String),
}

impl LocateError {
    #[must_use]
    pub fn kind(&self) -> LocationErrorKind {
        match self {
            Self::Unsupported => LocationErrorKind::Unsupported,
            Self::PermissionDenied => LocationErrorKind::PermissionDenied,
            Self::PositionUnavailable(_) => LocationErrorKind::PositionUnavailable,
            Self::Timeout { .. } => LocationErrorKind::Timeout,
            Self::Unknown(_) => LocationErrorKind::Unknown,
        }
    }
}

/// Failures from the key/value store backing the location cache.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not a JSON object: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },
}

/// Reasons a cached fix could not be read. Callers treat every variant as a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("malformed cached location: {0}")]
    Malformed(#[from] serde_json::Error),
}
