//! Client-side sample providers for when the backend has nothing to show.
//!
//! Every record is synthetic: ratings are flagged as placeholders and ids are
//! `sample-{i}`.

use carefinder_core::{round_tenth, Coordinate, ProviderRecord, Rating};
use rand::Rng;

const SPECIALTIES: [&str; 6] = [
    "Anxiety",
    "Depression",
    "Trauma",
    "Relationship",
    "CBT",
    "Family Therapy",
];
const FIRST_NAMES: [&str; 8] = [
    "Michael", "Jennifer", "David", "Sarah", "Robert", "Lisa", "John", "Emily",
];
const LAST_NAMES: [&str; 8] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Garcia",
];
const TITLES: [&str; 2] = ["Dr.", "LMFT"];

/// Maximum offset from the origin in degrees, on each axis (about a mile).
const MAX_OFFSET_DEG: f64 = 0.015;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

/// Generates `count` sample providers scattered around `origin`.
pub fn generate_sample_providers<R: Rng + ?Sized>(
    origin: Coordinate,
    count: usize,
    rng: &mut R,
) -> Vec<ProviderRecord> {
    (0..count)
        .map(|i| {
            let lat = (origin.latitude + rng.random_range(-MAX_OFFSET_DEG..MAX_OFFSET_DEG))
                .clamp(-90.0, 90.0);
            let lng = (origin.longitude + rng.random_range(-MAX_OFFSET_DEG..MAX_OFFSET_DEG))
                .clamp(-180.0, 180.0);
            let coordinate = Coordinate::new(lat, lng).unwrap_or(origin);

            let first = pick(rng, &FIRST_NAMES);
            let last = pick(rng, &LAST_NAMES);
            let specialty = pick(rng, &SPECIALTIES);
            let title = pick(rng, &TITLES);

            ProviderRecord {
                id: format!("sample-{i}"),
                name: format!("{title} {first} {last}"),
                specialty_tag: specialty.to_string(),
                coordinate,
                distance_miles: round_tenth(origin.distance_miles_to(&coordinate)),
                rating: Some(Rating::placeholder(round_tenth(
                    rng.random_range(3.5..=5.0),
                ))),
                review_count: rng.random_range(5..50),
                phone: format!(
                    "({}) {}-{}",
                    rng.random_range(100..1000),
                    rng.random_range(100..1000),
                    rng.random_range(1000..10000)
                ),
                website: Some(format!("https://example.com/therapist{i}")),
                address: format!(
                    "{} Main St, Suite {}",
                    rng.random_range(1000..10000),
                    rng.random_range(100..1000)
                ),
                initials: format!("{}{}", &first[..1], &last[..1]),
                reviews: Vec::new(),
            }
        })
        .collect()
}
