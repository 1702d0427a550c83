//! Address lookups offered by the mapping surface.

use std::future::Future;

use carefinder_core::Coordinate;

use crate::error::GeocodeError;

/// How far from a known place a reverse lookup may land and still name it.
pub const REVERSE_MATCH_RADIUS_MILES: f64 = 1.0;

/// Turns free-text addresses into coordinates and back.
pub trait Geocoder: Send + Sync {
    /// Resolves `address` to a coordinate.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send;

    /// Formatted address for the place nearest `position`.
    fn reverse_geocode(
        &self,
        position: Coordinate,
    ) -> impl Future<Output = Result<String, GeocodeError>> + Send;
}

/// A fixed table of known places.
///
/// Address matching ignores case and surrounding or repeated whitespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryGeocoder {
    places: Vec<(String, Coordinate)>,
}

impl MemoryGeocoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_place(mut self, address: impl Into<String>, position: Coordinate) -> Self {
        self.insert(address, position);
        self
    }

    pub fn insert(&mut self, address: impl Into<String>, position: Coordinate) {
        self.places.push((address.into(), position));
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn lookup(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let wanted = normalize_address(address);
        if wanted.is_empty() {
            return Err(GeocodeError::NotFound {
                query: address.to_string(),
            });
        }
        self.places
            .iter()
            .find(|(known, _)| normalize_address(known) == wanted)
            .map(|(_, position)| *position)
            .ok_or_else(|| GeocodeError::NotFound {
                query: address.to_string(),
            })
    }

    fn nearest(&self, position: Coordinate) -> Result<String, GeocodeError> {
        self.places
            .iter()
            .map(|(address, known)| (address, position.distance_miles_to(known)))
            .filter(|(_, miles)| *miles <= REVERSE_MATCH_RADIUS_MILES)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(address, _)| address.clone())
            .ok_or_else(|| GeocodeError::NoAddress {
                position: position.to_string(),
            })
    }
}

impl FromIterator<(String, Coordinate)> for MemoryGeocoder {
    fn from_iter<I: IntoIterator<Item = (String, Coordinate)>>(iter: I) -> Self {
        Self {
            places: iter.into_iter().collect(),
        }
    }
}

impl Geocoder for MemoryGeocoder {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send {
        let result = self.lookup(address);
        if result.is_err() {
            tracing::debug!(address, "geocode found no match");
        }
        async move { result }
    }

    fn reverse_geocode(
        &self,
        position: Coordinate,
    ) -> impl Future<Output = Result<String, GeocodeError>> + Send {
        let result = self.nearest(position);
        async move { result }
    }
}

fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
