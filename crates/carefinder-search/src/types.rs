//! Upstream result shapes accepted from the search backend and map SDK.
//!
//! Two shapes reach the normalizer:
//!
//! - **Place**: map-provider place records. Coordinates sit under
//!   `geometry.location`, either as a literal `{lat, lng}` object (JSON) or as
//!   a live SDK object exposing accessor methods ([`LatLngAccessor`]).
//!   Phone/address fields use the provider's names (`formatted_phone_number`,
//!   `vicinity`, `formatted_address`).
//! - **Listing**: the backend's flat records with top-level `latitude` /
//!   `longitude` and explicit contact fields.
//!
//! JSON decoding picks `Place` whenever a `geometry.location` object is
//! present and falls back to `Listing` otherwise. IDs, ratings and
//! coordinates arrive as strings or numbers depending on the source; both are
//! accepted.

use std::sync::Arc;

use carefinder_core::Coordinate;
use serde::{Deserialize, Deserializer};

/// Top-level response from `GET /api/nearby-therapists`.
///
/// Entries are kept as raw JSON so one malformed record does not sink the
/// whole response; see [`UpstreamRecord::from_value`].
#[derive(Debug, Default, Deserialize)]
pub struct NearbyResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub sample_results: Option<Vec<serde_json::Value>>,
}

/// One upstream record, shape resolved at decode time.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UpstreamRecord {
    Place(PlaceRecord),
    Listing(ListingRecord),
}

impl UpstreamRecord {
    /// Decodes one raw entry, returning `None` (and logging) when it matches
    /// neither shape.
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable search result");
                None
            }
        }
    }
}

/// A decoded record and its position in the raw response.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    pub index: usize,
    pub record: UpstreamRecord,
}

/// Decodes raw entries, skipping undecodable ones while keeping each
/// survivor's original position.
#[must_use]
pub fn decode_records(values: Vec<serde_json::Value>) -> Vec<IndexedRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            UpstreamRecord::from_value(value).map(|record| IndexedRecord { index, record })
        })
        .collect()
}

/// Live coordinate object from a mapping SDK, read through methods.
pub trait LatLngAccessor: Send + Sync + std::fmt::Debug {
    fn lat(&self) -> f64;
    fn lng(&self) -> f64;
}

/// A place coordinate as either plain fields or an accessor object.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "LatLngLiteral")]
pub enum GeoPoint {
    Literal { lat: f64, lng: f64 },
    Accessor(Arc<dyn LatLngAccessor>),
}

impl GeoPoint {
    /// Reads the point as `(lat, lng)` regardless of representation.
    #[must_use]
    pub fn lat_lng(&self) -> (f64, f64) {
        match self {
            Self::Literal { lat, lng } => (*lat, *lng),
            Self::Accessor(accessor) => (accessor.lat(), accessor.lng()),
        }
    }
}

#[derive(Deserialize)]
struct LatLngLiteral {
    #[serde(deserialize_with = "f64_or_string")]
    lat: f64,
    #[serde(deserialize_with = "f64_or_string")]
    lng: f64,
}

impl From<LatLngLiteral> for GeoPoint {
    fn from(v: LatLngLiteral) -> Self {
        Self::Literal {
            lat: v.lat,
            lng: v.lng,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceGeometry {
    pub location: GeoPoint,
}

/// Map-provider place record.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRecord {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub geometry: PlaceGeometry,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "opt_f64_or_string")]
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub formatted_phone_number: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub vicinity: Option<String>,
    pub formatted_address: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub reviews: Vec<UpstreamReview>,
}

/// Backend listing with flat coordinates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingRecord {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_f64_or_string")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64_or_string")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64_or_string")]
    pub rating: Option<f64>,
    #[serde(alias = "reviewCount")]
    pub review_count: Option<u32>,
    pub user_ratings_total: Option<u32>,
    pub phone: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub vicinity: Option<String>,
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub reviews: Vec<UpstreamReview>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamReview {
    #[serde(alias = "author")]
    pub author_name: Option<String>,
    #[serde(alias = "date")]
    pub relative_time_description: Option<String>,
    #[serde(default, deserialize_with = "opt_f64_or_string")]
    pub rating: Option<f64>,
    pub text: Option<String>,
}

/// Filters for the legacy `GET /nearby_therapists` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyQuery {
    pub coordinate: Coordinate,
    pub max_distance_miles: f64,
    /// `"all"` omits the filter.
    pub specialty: String,
    /// `"all"` omits the filter.
    pub insurance: String,
    /// `"any"` omits the filter.
    pub availability: String,
    pub sort_by: String,
    pub limit: u32,
}

impl LegacyQuery {
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            max_distance_miles: 10.0,
            specialty: "all".to_string(),
            insurance: "all".to_string(),
            availability: "any".to_string(),
            sort_by: "distance".to_string(),
            limit: 20,
        }
    }
}

/// Legacy endpoint body: a bare array or an object wrapping `results`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LegacyResponse {
    Bare(Vec<serde_json::Value>),
    Wrapped {
        #[serde(default)]
        results: Vec<serde_json::Value>,
    },
}

impl LegacyResponse {
    pub(crate) fn into_results(self) -> Vec<serde_json::Value> {
        match self {
            Self::Bare(results) | Self::Wrapped { results } => results,
        }
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => Some(s),
        Some(Raw::Num(n)) => Some(n.to_string()),
        None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Num(f64),
    Str(String),
}

impl LooseNumber {
    fn into_f64(self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(n),
            Self::Str(s) => s.trim().parse().ok(),
        }
    }
}

/// Accepts a number or a numeric string; any other string reads as absent.
fn opt_f64_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LooseNumber>::deserialize(deserializer)?.and_then(LooseNumber::into_f64))
}

fn f64_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    LooseNumber::deserialize(deserializer)?
        .into_f64()
        .ok_or_else(|| serde::de::Error::custom("expected a number or numeric string"))
}
