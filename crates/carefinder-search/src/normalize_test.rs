use std::sync::Arc;

use carefinder_core::{distance_miles, RatingSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use super::*;
use crate::types::{
    decode_records, GeoPoint, LatLngAccessor, ListingRecord, PlaceGeometry, PlaceRecord,
};

#[derive(Debug)]
struct SdkLatLng {
    lat: f64,
    lng: f64,
}

impl LatLngAccessor for SdkLatLng {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lng(&self) -> f64 {
        self.lng
    }
}

fn origin() -> Coordinate {
    Coordinate::new(37.77, -122.42).unwrap()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn place(name: &str, location: GeoPoint) -> PlaceRecord {
    PlaceRecord {
        place_id: Some("place-1".into()),
        id: None,
        name: name.into(),
        geometry: PlaceGeometry { location },
        types: vec!["health".into()],
        rating: Some(4.6),
        user_ratings_total: Some(18),
        formatted_phone_number: Some("(415) 555-0100".into()),
        phone: None,
        website: Some("https://example.org".into()),
        vicinity: Some("1 Market St".into()),
        formatted_address: None,
        address: None,
        reviews: Vec::new(),
    }
}

fn normalize_one(record: &UpstreamRecord) -> Option<ProviderRecord> {
    normalize_record(record, 0, origin(), NormalizeOptions::default(), &mut rng())
}

#[test]
fn accessor_and_literal_coordinates_normalize_identically() {
    let literal = UpstreamRecord::Place(place(
        "Dr. Jane Psychiatry Associates",
        GeoPoint::Literal {
            lat: 37.79,
            lng: -122.40,
        },
    ));
    let accessor = UpstreamRecord::Place(place(
        "Dr. Jane Psychiatry Associates",
        GeoPoint::Accessor(Arc::new(SdkLatLng {
            lat: 37.79,
            lng: -122.40,
        })),
    ));

    let a = normalize_one(&literal).unwrap();
    let b = normalize_one(&accessor).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.specialty_tag, "Psychiatry");
}

#[test]
fn place_and_listing_shapes_agree() {
    let place = UpstreamRecord::Place(place(
        "Harbor Counseling",
        GeoPoint::Literal {
            lat: 37.79,
            lng: -122.40,
        },
    ));
    let listing = UpstreamRecord::Listing(ListingRecord {
        place_id: Some("place-1".into()),
        name: "Harbor Counseling".into(),
        latitude: Some(37.79),
        longitude: Some(-122.40),
        rating: Some(4.6),
        review_count: Some(18),
        phone: Some("(415) 555-0100".into()),
        website: Some("https://example.org".into()),
        address: Some("1 Market St".into()),
        ..ListingRecord::default()
    });

    assert_eq!(normalize_one(&place), normalize_one(&listing));
}

#[test]
fn unmatched_name_defaults_to_therapy() {
    let record: UpstreamRecord = serde_json::from_value(json!({
        "name": "Sunshine Family Center",
        "latitude": 37.78,
        "longitude": -122.41
    }))
    .unwrap();
    assert_eq!(normalize_one(&record).unwrap().specialty_tag, "Therapy");
}

#[test]
fn distance_is_haversine_from_origin_rounded() {
    let record: UpstreamRecord = serde_json::from_value(json!({
        "name": "Bayview Anxiety Clinic",
        "latitude": 37.73,
        "longitude": -122.39
    }))
    .unwrap();
    let provider = normalize_one(&record).unwrap();
    let expected = round_tenth(distance_miles(37.77, -122.42, 37.73, -122.39));
    assert!((provider.distance_miles - expected).abs() < f64::EPSILON);
    assert_eq!(provider.specialty_tag, "Anxiety");
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let record: UpstreamRecord = serde_json::from_value(json!({
        "name": "",
        "latitude": 1.0,
        "longitude": 1.0,
        "website": "#",
        "reviews": [{}, {"author_name": "Kim", "rating": 5, "text": "Helpful"}]
    }))
    .unwrap();
    let provider = normalize_record(&record, 3, origin(), NormalizeOptions::default(), &mut rng())
        .unwrap();

    assert_eq!(provider.id, "t-3");
    assert_eq!(provider.initials, "T");
    assert_eq!(provider.phone, "Contact for details");
    assert_eq!(provider.address, "Address not available");
    assert_eq!(provider.website, None);
    assert_eq!(provider.review_count, 2);
    assert_eq!(provider.reviews[0].author, "Anonymous");
    assert_eq!(provider.reviews[0].date, "Recent");
    assert!((provider.reviews[0].rating - 4.0).abs() < f64::EPSILON);
    assert_eq!(provider.reviews[0].text, "No comment provided.");
    assert_eq!(provider.reviews[1].author, "Kim");
}

#[test]
fn review_count_prefers_user_ratings_total() {
    let record: UpstreamRecord = serde_json::from_value(json!({
        "name": "A",
        "latitude": 1.0,
        "longitude": 1.0,
        "user_ratings_total": 40,
        "reviewCount": 3,
        "reviews": [{}]
    }))
    .unwrap();
    assert_eq!(normalize_one(&record).unwrap().review_count, 40);
}

#[test]
fn address_chain_prefers_vicinity() {
    let record: UpstreamRecord = serde_json::from_value(json!({
        "name": "A",
        "geometry": {"location": {"lat": 1.0, "lng": 1.0}},
        "formatted_address": "Long form",
        "vicinity": "Short form",
        "phone": "555-0199"
    }))
    .unwrap();
    let provider = normalize_one(&record).unwrap();
    assert_eq!(provider.address, "Short form");
    assert_eq!(provider.phone, "555-0199");
}

#[test]
fn missing_rating_gets_flagged_placeholder_in_range() {
    let record: UpstreamRecord = serde_json::from_value(json!({
        "name": "A",
        "latitude": 1.0,
        "longitude": 1.0
    }))
    .unwrap();
    let mut rng = rng();
    for index in 0..50 {
        let rating = normalize_record(&record, index, origin(), NormalizeOptions::default(), &mut rng)
            .unwrap()
            .rating
            .unwrap();
        assert_eq!(rating.source, RatingSource::Placeholder);
        assert!((3.5..=5.0).contains(&rating.value), "{}", rating.value);
        assert!((rating.value * 10.0 - (rating.value * 10.0).round()).abs() < 1e-9);
    }
}

#[test]
fn placeholder_ratings_can_be_disabled() {
    let record: UpstreamRecord = serde_json::from_value(json!({
        "name": "A",
        "latitude": 1.0,
        "longitude": 1.0
    }))
    .unwrap();
    let options = NormalizeOptions {
        placeholder_ratings: false,
    };
    let provider = normalize_record(&record, 0, origin(), options, &mut rng()).unwrap();
    assert_eq!(provider.rating, None);
}

#[test]
fn upstream_rating_is_kept_as_is() {
    let record: UpstreamRecord = serde_json::from_value(json!({
        "name": "A",
        "latitude": 1.0,
        "longitude": 1.0,
        "rating": 4.25
    }))
    .unwrap();
    assert_eq!(
        normalize_one(&record).unwrap().rating,
        Some(Rating::upstream(4.25))
    );
}

#[test]
fn records_without_valid_coordinates_are_discarded() {
    let records = decode_records(vec![
        json!({"name": "no coords"}),
        json!({"name": "bad lat", "latitude": 95.0, "longitude": 0.0}),
        json!({"name": "ok", "latitude": 10.0, "longitude": 10.0}),
        json!({"name": "bad lng", "geometry": {"location": {"lat": 0.0, "lng": 181.0}}}),
    ]);
    assert_eq!(records.len(), 4);

    let providers = normalize_all(&records, origin(), NormalizeOptions::default(), &mut rng());
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].name, "ok");
    assert_eq!(providers[0].id, "t-2");
}

#[test]
fn synthesized_ids_follow_raw_response_position() {
    let records = decode_records(vec![
        json!({"name": 12}),
        json!({"name": "first", "latitude": 10.0, "longitude": 10.0}),
        json!("garbage"),
        json!({"name": "second", "latitude": 11.0, "longitude": 11.0}),
    ]);

    let providers = normalize_all(&records, origin(), NormalizeOptions::default(), &mut rng());
    let ids: Vec<&str> = providers.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["t-1", "t-3"]);
}

#[test]
fn string_typed_numbers_survive_normalization() {
    let records = decode_records(vec![json!({
        "id": "a",
        "name": "Harbor Counseling",
        "latitude": "37.78",
        "longitude": "-122.41",
        "rating": "4.5",
        "reviews": [{"author": "Sam", "rating": "3.5", "text": "Helpful"}]
    })]);

    let providers = normalize_all(&records, origin(), NormalizeOptions::default(), &mut rng());
    assert_eq!(providers.len(), 1);
    let provider = &providers[0];
    assert_eq!(provider.id, "a");
    assert_eq!(provider.coordinate, Coordinate::new(37.78, -122.41).unwrap());
    assert_eq!(provider.rating, Some(Rating::upstream(4.5)));
    assert!((provider.reviews[0].rating - 3.5).abs() < f64::EPSILON);
}
