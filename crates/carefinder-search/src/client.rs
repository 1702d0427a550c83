//! HTTP client for the therapist search backend.
//!
//! Two endpoints are supported: the enhanced `GET /api/nearby-therapists`
//! and the older filterable `GET /nearby_therapists`. Both return raw
//! upstream records; normalization is the caller's job.

use std::time::Duration;

use carefinder_core::{AppConfig, SearchQuery};
use reqwest::{Client, Url};

use crate::error::SearchError;
use crate::types::{decode_records, IndexedRecord, LegacyQuery, LegacyResponse, NearbyResponse};

const DEFAULT_USER_AGENT: &str = "carefinder/0.1 (therapist-finder)";
const NEARBY_PATH: &str = "api/nearby-therapists";
const LEGACY_PATH: &str = "nearby_therapists";

/// Client for the search backend.
///
/// Use [`SearchClient::from_config`] in the binary or
/// [`SearchClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    base_url: Url,
}

impl SearchClient {
    /// # Errors
    ///
    /// Returns [`SearchError::Network`] if the HTTP client cannot be built, or
    /// [`SearchError::InvalidBaseUrl`] if the configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        Self::build(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with default timeouts against `base_url`.
    ///
    /// # Errors
    ///
    /// Same as [`SearchClient::from_config`].
    pub fn with_base_url(base_url: &str) -> Result<Self, SearchError> {
        Self::build(base_url, 30, DEFAULT_USER_AGENT)
    }

    fn build(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins append to the path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SearchError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Calls the enhanced search endpoint for `query`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::HttpStatus`] on a non-2xx response.
    /// - [`SearchError::Network`] on transport failure.
    /// - [`SearchError::Deserialize`] if the body is not the expected JSON.
    pub async fn nearby(&self, query: &SearchQuery) -> Result<NearbyResponse, SearchError> {
        let url = self.nearby_url(query)?;
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| SearchError::Deserialize {
            context: format!("nearby-therapists({})", query.cache_key()),
            source: e,
        })
    }

    /// Calls the legacy filterable endpoint.
    ///
    /// The endpoint may answer with a bare array or an object wrapping
    /// `results`; entries that match no known shape are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`SearchClient::nearby`].
    pub async fn legacy_search(
        &self,
        query: &LegacyQuery,
    ) -> Result<Vec<IndexedRecord>, SearchError> {
        let url = self.legacy_url(query)?;
        let body = self.request_json(&url).await?;
        let response: LegacyResponse =
            serde_json::from_value(body).map_err(|e| SearchError::Deserialize {
                context: format!(
                    "nearby_therapists(lat={}, lng={})",
                    query.coordinate.latitude, query.coordinate.longitude
                ),
                source: e,
            })?;

        Ok(decode_records(response.into_results()))
    }

    fn nearby_url(&self, query: &SearchQuery) -> Result<Url, SearchError> {
        let lat = query.coordinate.latitude.to_string();
        let lng = query.coordinate.longitude.to_string();
        let enhanced = query.use_enhanced_search.to_string();
        self.build_url(
            NEARBY_PATH,
            &[
                ("lat", lat.as_str()),
                ("lng", lng.as_str()),
                ("specialty", query.specialty.as_str()),
                ("use_gemini", enhanced.as_str()),
            ],
        )
    }

    fn legacy_url(&self, query: &LegacyQuery) -> Result<Url, SearchError> {
        let lat = query.coordinate.latitude.to_string();
        let lng = query.coordinate.longitude.to_string();
        let distance = query.max_distance_miles.to_string();
        let limit = query.limit.to_string();

        let mut params = vec![
            ("lat", lat.as_str()),
            ("lng", lng.as_str()),
            ("distance", distance.as_str()),
        ];
        if query.specialty != "all" {
            params.push(("specialty", query.specialty.as_str()));
        }
        if query.insurance != "all" {
            params.push(("insurance", query.insurance.as_str()));
        }
        if query.availability != "any" {
            params.push(("availability", query.availability.as_str()));
        }
        params.push(("sort", query.sort_by.as_str()));
        params.push(("limit", limit.as_str()));

        self.build_url(LEGACY_PATH, &params)
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, SearchError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| SearchError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, requires a 2xx status, and parses the body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, SearchError> {
        tracing::debug!(url = %url, "search request");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
