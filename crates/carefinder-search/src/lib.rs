pub mod client;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod sample;
pub mod types;

pub use client::SearchClient;
pub use error::SearchError;
pub use normalize::{normalize_all, normalize_record, NormalizeOptions};
pub use orchestrator::{SearchOptions, SearchOrchestrator, SearchOutcome, DEFAULT_SAMPLE_COUNT};
pub use sample::generate_sample_providers;
pub use types::{
    decode_records, GeoPoint, IndexedRecord, LatLngAccessor, LegacyQuery, ListingRecord,
    NearbyResponse, PlaceGeometry, PlaceRecord, UpstreamRecord, UpstreamReview,
};
