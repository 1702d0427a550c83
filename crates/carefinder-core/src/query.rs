use crate::geo::Coordinate;

/// Input to one nearby-provider search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub coordinate: Coordinate,
    /// Empty means "any specialty".
    pub specialty: String,
    pub use_enhanced_search: bool,
}

impl SearchQuery {
    /// Builds a query, folding the UI's `"all"` choice into the empty filter.
    #[must_use]
    pub fn new(coordinate: Coordinate, specialty: &str, use_enhanced_search: bool) -> Self {
        let specialty = specialty.trim();
        let specialty = if specialty.eq_ignore_ascii_case("all") {
            String::new()
        } else {
            specialty.to_string()
        };
        Self {
            coordinate,
            specialty,
            use_enhanced_search,
        }
    }

    /// Result-cache key: `"{lat},{lng},{specialty},{enhanced|standard}"`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{},{},{},{}",
            self.coordinate.latitude,
            self.coordinate.longitude,
            self.specialty,
            if self.use_enhanced_search {
                "enhanced"
            } else {
                "standard"
            }
        )
    }
}
