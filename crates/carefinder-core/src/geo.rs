//! Coordinates, viewport bounds, and great-circle distance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius used for every distance shown to the user.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting out-of-range or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] naming the offending axis.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Distance to `other` in miles, unrounded.
    #[must_use]
    pub fn distance_miles_to(&self, other: &Coordinate) -> f64 {
        distance_miles(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// A single resolved device location reading.
///
/// Serialized flat, matching the persisted record layout:
/// `{latitude, longitude, accuracy, timestamp}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of uncertainty in metres.
    pub accuracy: f64,
    /// Epoch milliseconds at which the fix was taken.
    pub timestamp: i64,
}

impl Fix {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Haversine distance in miles between two points given in degrees.
#[must_use]
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Rounds to one decimal place, halves away from zero.
#[must_use]
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Minimal box covering a set of coordinates.
///
/// Starts empty; the first [`Bounds::extend`] collapses it onto that point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    extent: Option<Extent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl Bounds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, point: Coordinate) {
        let lat = point.latitude;
        let lng = point.longitude;
        self.extent = Some(match self.extent {
            None => Extent {
                south: lat,
                west: lng,
                north: lat,
                east: lng,
            },
            Some(e) => Extent {
                south: e.south.min(lat),
                west: e.west.min(lng),
                north: e.north.max(lat),
                east: e.east.max(lng),
            },
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    #[must_use]
    pub fn center(&self) -> Option<Coordinate> {
        self.extent.map(|e| Coordinate {
            latitude: (e.south + e.north) / 2.0,
            longitude: (e.west + e.east) / 2.0,
        })
    }

    /// Latitude and longitude span in degrees; `(0, 0)` for a single point.
    #[must_use]
    pub fn span(&self) -> Option<(f64, f64)> {
        self.extent.map(|e| (e.north - e.south, e.east - e.west))
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        self.extent.is_some_and(|e| {
            (e.south..=e.north).contains(&point.latitude)
                && (e.west..=e.east).contains(&point.longitude)
        })
    }
}
