//! Upstream record → [`ProviderRecord`].
//!
//! Both upstream shapes are first flattened into one borrowed view, so every
//! rule below is written once.

use carefinder_core::{
    initials_for_name, round_tenth, specialty_for_name, Coordinate, ProviderRecord, Rating,
    Review,
};
use rand::Rng;

use crate::types::{IndexedRecord, UpstreamRecord, UpstreamReview};

const DEFAULT_PHONE: &str = "Contact for details";
const DEFAULT_ADDRESS: &str = "Address not available";
const DEFAULT_REVIEW_AUTHOR: &str = "Anonymous";
const DEFAULT_REVIEW_DATE: &str = "Recent";
const DEFAULT_REVIEW_RATING: f64 = 4.0;
const DEFAULT_REVIEW_TEXT: &str = "No comment provided.";

const PLACEHOLDER_RATING_MIN: f64 = 3.5;
const PLACEHOLDER_RATING_MAX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Fill a missing upstream rating with a random, flagged placeholder.
    /// When off the rating stays `None`.
    pub placeholder_ratings: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            placeholder_ratings: true,
        }
    }
}

/// Borrowed, shape-independent view of one upstream record.
struct Resolved<'a> {
    id: Option<&'a str>,
    name: &'a str,
    lat_lng: (f64, f64),
    rating: Option<f64>,
    review_total: Option<u32>,
    phone: Option<&'a str>,
    website: Option<&'a str>,
    address: Option<&'a str>,
    reviews: &'a [UpstreamReview],
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl<'a> Resolved<'a> {
    fn from_record(record: &'a UpstreamRecord) -> Option<Self> {
        match record {
            UpstreamRecord::Place(place) => Some(Self {
                id: present(place.place_id.as_ref()).or_else(|| present(place.id.as_ref())),
                name: &place.name,
                lat_lng: place.geometry.location.lat_lng(),
                rating: place.rating,
                review_total: place.user_ratings_total,
                phone: present(place.formatted_phone_number.as_ref())
                    .or_else(|| present(place.phone.as_ref())),
                website: present(place.website.as_ref()),
                address: present(place.vicinity.as_ref())
                    .or_else(|| present(place.formatted_address.as_ref()))
                    .or_else(|| present(place.address.as_ref())),
                reviews: &place.reviews,
            }),
            UpstreamRecord::Listing(listing) => Some(Self {
                id: present(listing.place_id.as_ref()).or_else(|| present(listing.id.as_ref())),
                name: &listing.name,
                lat_lng: (listing.latitude?, listing.longitude?),
                rating: listing.rating,
                review_total: listing.user_ratings_total.or(listing.review_count),
                phone: present(listing.formatted_phone_number.as_ref())
                    .or_else(|| present(listing.phone.as_ref())),
                website: present(listing.website.as_ref()),
                address: present(listing.vicinity.as_ref())
                    .or_else(|| present(listing.formatted_address.as_ref()))
                    .or_else(|| present(listing.address.as_ref())),
                reviews: &listing.reviews,
            }),
        }
    }
}

/// Normalizes one upstream record found at `index` in the response.
///
/// Returns `None` when the record has no coordinate or one outside the valid
/// latitude/longitude ranges.
pub fn normalize_record<R: Rng + ?Sized>(
    record: &UpstreamRecord,
    index: usize,
    origin: Coordinate,
    options: NormalizeOptions,
    rng: &mut R,
) -> Option<ProviderRecord> {
    let Some(fields) = Resolved::from_record(record) else {
        tracing::warn!(index, "discarding search result without coordinates");
        return None;
    };
    let (lat, lng) = fields.lat_lng;
    let coordinate = match Coordinate::new(lat, lng) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(index, error = %e, "discarding search result with invalid coordinates");
            return None;
        }
    };

    let rating = match fields.rating.filter(|r| r.is_finite()) {
        Some(value) => Some(Rating::upstream(value)),
        None if options.placeholder_ratings => Some(Rating::placeholder(round_tenth(
            rng.random_range(PLACEHOLDER_RATING_MIN..=PLACEHOLDER_RATING_MAX),
        ))),
        None => None,
    };

    let review_count = fields
        .review_total
        .unwrap_or_else(|| u32::try_from(fields.reviews.len()).unwrap_or(u32::MAX));

    let website = fields
        .website
        .filter(|w| *w != "#")
        .map(ToString::to_string);

    Some(ProviderRecord {
        id: fields
            .id
            .map_or_else(|| format!("t-{index}"), ToString::to_string),
        name: fields.name.to_string(),
        specialty_tag: specialty_for_name(fields.name).to_string(),
        coordinate,
        distance_miles: round_tenth(origin.distance_miles_to(&coordinate)),
        rating,
        review_count,
        phone: fields.phone.unwrap_or(DEFAULT_PHONE).to_string(),
        website,
        address: fields.address.unwrap_or(DEFAULT_ADDRESS).to_string(),
        initials: initials_for_name(fields.name),
        reviews: fields.reviews.iter().map(normalize_review).collect(),
    })
}

/// Normalizes every record in response order, skipping discarded ones.
///
/// Synthesized ids use each record's position in the raw response.
pub fn normalize_all<R: Rng + ?Sized>(
    records: &[IndexedRecord],
    origin: Coordinate,
    options: NormalizeOptions,
    rng: &mut R,
) -> Vec<ProviderRecord> {
    records
        .iter()
        .filter_map(|r| normalize_record(&r.record, r.index, origin, options, rng))
        .collect()
}

fn normalize_review(review: &UpstreamReview) -> Review {
    Review {
        author: present(review.author_name.as_ref())
            .unwrap_or(DEFAULT_REVIEW_AUTHOR)
            .to_string(),
        date: present(review.relative_time_description.as_ref())
            .unwrap_or(DEFAULT_REVIEW_DATE)
            .to_string(),
        rating: review
            .rating
            .filter(|r| r.is_finite())
            .unwrap_or(DEFAULT_REVIEW_RATING),
        text: present(review.text.as_ref())
            .unwrap_or(DEFAULT_REVIEW_TEXT)
            .to_string(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
