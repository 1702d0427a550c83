//! Search orchestration: query-key cache, backend call, normalization and
//! search notifications.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use carefinder_core::{AppConfig, Coordinate, EventBus, Notification, ProviderRecord, SearchQuery};

use crate::client::SearchClient;
use crate::error::SearchError;
use crate::normalize::{normalize_all, NormalizeOptions};
use crate::sample::generate_sample_providers;
use crate::types::{decode_records, IndexedRecord, LegacyQuery};

/// Default number of client-generated sample providers.
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub placeholder_ratings: bool,
    /// Allow [`SearchOrchestrator::sample_fallback`] to generate data.
    pub sample_fallback: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            placeholder_ratings: true,
            sample_fallback: false,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            placeholder_ratings: config.placeholder_ratings,
            sample_fallback: config.sample_fallback,
        }
    }
}

/// Result of one search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Real results, now cached under the query key.
    Found(Vec<ProviderRecord>),
    /// The backend had no results but supplied sample data. Never cached.
    Fallback(Vec<ProviderRecord>),
    /// Nothing to show. Never cached.
    Empty,
}

impl SearchOutcome {
    #[must_use]
    pub fn records(&self) -> &[ProviderRecord] {
        match self {
            Self::Found(records) | Self::Fallback(records) => records,
            Self::Empty => &[],
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Runs searches against the backend and caches successful result sets by
/// query key for the lifetime of the orchestrator.
///
/// Concurrent searches for the same key are not coalesced; whichever
/// finishes last owns the cache entry.
pub struct SearchOrchestrator {
    client: SearchClient,
    bus: EventBus,
    options: SearchOptions,
    cache: Mutex<HashMap<String, Vec<ProviderRecord>>>,
}

impl SearchOrchestrator {
    pub fn new(client: SearchClient, bus: EventBus, options: SearchOptions) -> Self {
        Self {
            client,
            bus,
            options,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns providers near `query.coordinate`.
    ///
    /// A previous `Found` result for the same query key is returned without
    /// touching the network.
    ///
    /// # Errors
    ///
    /// Any [`SearchError`] from the backend call. The cache is left as is.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        let key = query.cache_key();

        if let Some(records) = self.cached(&key) {
            tracing::debug!(query_key = %key, count = records.len(), "search cache hit");
            self.publish_success(&key, records.len(), false);
            return Ok(SearchOutcome::Found(records));
        }

        self.bus.publish(Notification::SearchLoading {
            query_key: key.clone(),
        });

        let response = match self.client.nearby(query).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(&key, e)),
        };

        let results = decode_records(response.results);
        let records = self.normalize(&results, query.coordinate);
        if !records.is_empty() {
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.clone(), records.clone());
            tracing::info!(query_key = %key, count = records.len(), "search complete");
            self.publish_success(&key, records.len(), false);
            return Ok(SearchOutcome::Found(records));
        }

        let samples = decode_records(response.sample_results.unwrap_or_default());
        let samples = self.normalize(&samples, query.coordinate);
        if !samples.is_empty() {
            tracing::info!(query_key = %key, count = samples.len(), "using backend sample results");
            self.publish_success(&key, samples.len(), true);
            return Ok(SearchOutcome::Fallback(samples));
        }

        tracing::info!(query_key = %key, "search returned no providers");
        self.publish_success(&key, 0, false);
        Ok(SearchOutcome::Empty)
    }

    /// Searches the legacy filterable endpoint. Results are not cached.
    ///
    /// # Errors
    ///
    /// Any [`SearchError`] from the backend call.
    pub async fn legacy_search(
        &self,
        query: &LegacyQuery,
    ) -> Result<Vec<ProviderRecord>, SearchError> {
        let key = format!(
            "legacy:{},{}",
            query.coordinate.latitude, query.coordinate.longitude
        );
        self.bus.publish(Notification::SearchLoading {
            query_key: key.clone(),
        });

        let results = match self.client.legacy_search(query).await {
            Ok(results) => results,
            Err(e) => return Err(self.fail(&key, e)),
        };
        let records = self.normalize(&results, query.coordinate);
        self.publish_success(&key, records.len(), false);
        Ok(records)
    }

    /// Generates sample providers around the query origin, or `None` when
    /// sample data is disabled.
    pub fn sample_fallback(&self, query: &SearchQuery, count: usize) -> Option<Vec<ProviderRecord>> {
        if !self.options.sample_fallback {
            return None;
        }
        tracing::info!(count, "generating client-side sample providers");
        let samples = generate_sample_providers(query.coordinate, count, &mut rand::rng());
        self.publish_success(&query.cache_key(), samples.len(), true);
        Some(samples)
    }

    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of query keys currently cached.
    pub fn cached_queries(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, key: &str) -> Option<Vec<ProviderRecord>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn normalize(&self, records: &[IndexedRecord], origin: Coordinate) -> Vec<ProviderRecord> {
        let options = NormalizeOptions {
            placeholder_ratings: self.options.placeholder_ratings,
        };
        normalize_all(records, origin, options, &mut rand::rng())
    }

    fn publish_success(&self, key: &str, count: usize, fallback: bool) {
        self.bus.publish(Notification::SearchSuccess {
            query_key: key.to_string(),
            count,
            fallback,
        });
    }

    fn fail(&self, key: &str, error: SearchError) -> SearchError {
        tracing::warn!(query_key = %key, error = %error, "search failed");
        self.bus.publish(Notification::SearchError {
            query_key: key.to_string(),
            message: error.to_string(),
        });
        error
    }
}
