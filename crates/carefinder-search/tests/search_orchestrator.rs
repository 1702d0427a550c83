//! Integration tests for `SearchOrchestrator` and `SearchClient`.
//!
//! Each test stands up a local `wiremock` server in place of the search
//! backend.

use carefinder_core::{
    distance_miles, round_tenth, Coordinate, EventBus, Notification, SearchQuery,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use carefinder_search::{
    LegacyQuery, SearchClient, SearchError, SearchOptions, SearchOrchestrator, SearchOutcome,
};

const ORIGIN_LAT: f64 = 37.77;
const ORIGIN_LNG: f64 = -122.42;

fn origin() -> Coordinate {
    Coordinate::new(ORIGIN_LAT, ORIGIN_LNG).expect("valid origin")
}

fn orchestrator(server: &MockServer, bus: EventBus) -> SearchOrchestrator {
    let client = SearchClient::with_base_url(&server.uri()).expect("failed to build test client");
    SearchOrchestrator::new(client, bus, SearchOptions::default())
}

/// Three backend records without any `distance` field.
fn three_records() -> serde_json::Value {
    json!({
        "results": [
            {
                "place_id": "p1",
                "name": "Mission Psychology Group",
                "geometry": {"location": {"lat": 37.76, "lng": -122.42}},
                "rating": 4.8,
                "user_ratings_total": 31
            },
            {
                "place_id": "p2",
                "name": "Golden Gate Wellness",
                "geometry": {"location": {"lat": 37.80, "lng": -122.45}},
                "rating": 4.1
            },
            {
                "id": "p3",
                "name": "Sunset Couples Counseling",
                "latitude": 37.75,
                "longitude": -122.49,
                "rating": 3.9,
                "reviewCount": 4
            }
        ]
    })
}

// ---------------------------------------------------------------------------
// Enhanced search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_normalizes_records_lacking_distance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby-therapists"))
        .and(query_param("lat", "37.77"))
        .and(query_param("lng", "-122.42"))
        .and(query_param("specialty", ""))
        .and(query_param("use_gemini", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_records()))
        .expect(1)
        .mount(&server)
        .await;

    let search = orchestrator(&server, EventBus::new());
    let outcome = search
        .search(&SearchQuery::new(origin(), "", true))
        .await
        .expect("search should succeed");

    let SearchOutcome::Found(records) = outcome else {
        panic!("expected Found, got {outcome:?}");
    };
    assert_eq!(records.len(), 3);

    let expected = [
        ("p1", 37.76, -122.42, "Psychology"),
        ("p2", 37.80, -122.45, "Therapy"),
        ("p3", 37.75, -122.49, "Couples Therapy"),
    ];
    for (record, (id, lat, lng, tag)) in records.iter().zip(expected) {
        assert_eq!(record.id, id);
        let distance = round_tenth(distance_miles(ORIGIN_LAT, ORIGIN_LNG, lat, lng));
        assert!(
            (record.distance_miles - distance).abs() < f64::EPSILON,
            "{id}: {} != {distance}",
            record.distance_miles
        );
        assert_eq!(record.specialty_tag, tag);
    }
    assert_eq!(records[2].review_count, 4);
}

#[tokio::test]
async fn identical_query_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby-therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_records()))
        .expect(1)
        .mount(&server)
        .await;

    let search = orchestrator(&server, EventBus::new());
    let query = SearchQuery::new(origin(), "all", true);

    let first = search.search(&query).await.expect("first search");
    let second = search.search(&query).await.expect("second search");

    assert_eq!(first, second);
    assert_eq!(search.cached_queries(), 1);
}

#[tokio::test]
async fn different_mode_is_a_different_cache_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby-therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_records()))
        .expect(2)
        .mount(&server)
        .await;

    let search = orchestrator(&server, EventBus::new());
    search
        .search(&SearchQuery::new(origin(), "", true))
        .await
        .expect("enhanced search");
    search
        .search(&SearchQuery::new(origin(), "", false))
        .await
        .expect("standard search");
    assert_eq!(search.cached_queries(), 2);
}

#[tokio::test]
async fn clear_cache_forces_a_new_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby-therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_records()))
        .expect(2)
        .mount(&server)
        .await;

    let search = orchestrator(&server, EventBus::new());
    let query = SearchQuery::new(origin(), "", true);
    search.search(&query).await.expect("first search");
    search.clear_cache();
    search.search(&query).await.expect("second search");
}

#[tokio::test]
async fn non_2xx_surfaces_http_status_and_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby-therapists"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let search = orchestrator(&server, bus);
    let query = SearchQuery::new(origin(), "", true);

    let err = search.search(&query).await.unwrap_err();
    assert!(
        matches!(err, SearchError::HttpStatus { status: 503, .. }),
        "expected HttpStatus(503), got: {err:?}"
    );
    assert!(search.search(&query).await.is_err());
    assert_eq!(search.cached_queries(), 0);

    assert!(matches!(
        rx.try_recv().unwrap(),
        Notification::SearchLoading { .. }
    ));
    assert!(matches!(
        rx.try_recv().unwrap(),
        Notification::SearchError { .. }
    ));
}

#[tokio::test]
async fn invalid_json_surfaces_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby-therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let search = orchestrator(&server, EventBus::new());
    let err = search
        .search(&SearchQuery::new(origin(), "", true))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Deserialize { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_backend_surfaces_network_error() {
    let client = SearchClient::with_base_url("http://127.0.0.1:1").expect("client");
    let search = SearchOrchestrator::new(client, EventBus::new(), SearchOptions::default());
    let err = search
        .search(&SearchQuery::new(origin(), "", true))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn backend_samples_are_returned_as_uncached_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby-therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "sample_results": [
                {"name": "Sample Trauma Center", "latitude": 37.78, "longitude": -122.41}
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let search = orchestrator(&server, bus);
    let query = SearchQuery::new(origin(), "", true);

    let outcome = search.search(&query).await.expect("search");
    assert!(outcome.is_fallback());
    assert_eq!(outcome.records()[0].specialty_tag, "Trauma & PTSD");

    search.search(&query).await.expect("repeat search");
    assert_eq!(search.cached_queries(), 0);

    let _loading = rx.try_recv().unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        Notification::SearchSuccess {
            query_key: query.cache_key(),
            count: 1,
            fallback: true,
        }
    );
}

#[tokio::test]
async fn empty_results_are_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby-therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let search = orchestrator(&server, EventBus::new());
    let outcome = search
        .search(&SearchQuery::new(origin(), "", true))
        .await
        .expect("empty is not a failure");
    assert_eq!(outcome, SearchOutcome::Empty);
    assert!(outcome.records().is_empty());
    assert_eq!(search.cached_queries(), 0);
}

#[tokio::test]
async fn sample_fallback_requires_opt_in() {
    let server = MockServer::start().await;
    let client = SearchClient::with_base_url(&server.uri()).expect("client");
    let query = SearchQuery::new(origin(), "", true);

    let disabled = SearchOrchestrator::new(client.clone(), EventBus::new(), SearchOptions::default());
    assert!(disabled.sample_fallback(&query, 5).is_none());

    let enabled = SearchOrchestrator::new(
        client,
        EventBus::new(),
        SearchOptions {
            sample_fallback: true,
            ..SearchOptions::default()
        },
    );
    let samples = enabled.sample_fallback(&query, 5).expect("samples enabled");
    assert_eq!(samples.len(), 5);
    assert!(samples.iter().all(|p| p.id.starts_with("sample-")));
}

// ---------------------------------------------------------------------------
// Legacy endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn legacy_search_omits_default_filters_and_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nearby_therapists"))
        .and(query_param("distance", "10"))
        .and(query_param("sort", "distance"))
        .and(query_param("limit", "20"))
        .and(query_param_is_missing("specialty"))
        .and(query_param_is_missing("insurance"))
        .and(query_param_is_missing("availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Dr. Lee Child Psychology", "latitude": 37.78, "longitude": -122.40}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let search = orchestrator(&server, EventBus::new());
    let records = search
        .legacy_search(&LegacyQuery::new(origin()))
        .await
        .expect("legacy search");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "7");
    assert_eq!(records[0].specialty_tag, "Psychology");
}

#[tokio::test]
async fn legacy_search_accepts_wrapped_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nearby_therapists"))
        .and(query_param("insurance", "aetna"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"name": "A", "latitude": 37.78, "longitude": -122.40},
                {"name": "B", "latitude": 37.79, "longitude": -122.41}
            ]
        })))
        .mount(&server)
        .await;

    let search = orchestrator(&server, EventBus::new());
    let query = LegacyQuery {
        insurance: "aetna".into(),
        ..LegacyQuery::new(origin())
    };
    let records = search.legacy_search(&query).await.expect("legacy search");
    assert_eq!(records.len(), 2);
}
