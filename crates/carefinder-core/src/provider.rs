//! Canonical provider record shared by search and view.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Tag used when a provider name matches none of the specialty keywords.
pub const DEFAULT_SPECIALTY: &str = "Therapy";

/// Ordered keyword table; the first row with any matching keyword wins.
const SPECIALTY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["psychologist", "psychology"], "Psychology"),
    (&["psychiatrist", "psychiatry"], "Psychiatry"),
    (&["marriage", "couple"], "Couples Therapy"),
    (&["child", "pediatric"], "Child Therapy"),
    (&["trauma"], "Trauma & PTSD"),
    (&["depress"], "Depression"),
    (&["anxiety"], "Anxiety"),
];

/// Where a displayed rating came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingSource {
    /// Reported by the upstream listing.
    Upstream,
    /// Filled in client-side because upstream had none. Not a measurement.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub value: f64,
    pub source: RatingSource,
}

impl Rating {
    #[must_use]
    pub fn upstream(value: f64) -> Self {
        Self {
            value,
            source: RatingSource::Upstream,
        }
    }

    #[must_use]
    pub fn placeholder(value: f64) -> Self {
        Self {
            value,
            source: RatingSource::Placeholder,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.source == RatingSource::Placeholder
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub date: String,
    pub rating: f64,
    pub text: String,
}

/// A normalized therapist listing.
///
/// Built once per search result and never mutated; a new search produces a
/// new set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Never empty. Upstream IDs are kept verbatim; missing ones become `t-{index}`.
    pub id: String,
    pub name: String,
    pub specialty_tag: String,
    pub coordinate: Coordinate,
    /// Haversine distance from the search origin, rounded to one decimal.
    pub distance_miles: f64,
    pub rating: Option<Rating>,
    pub review_count: u32,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub initials: String,
    pub reviews: Vec<Review>,
}

/// Derives a specialty tag from a provider name by case-insensitive keyword scan.
///
/// ```
/// use carefinder_core::specialty_for_name;
///
/// assert_eq!(specialty_for_name("Dr. Jane Psychiatry Associates"), "Psychiatry");
/// assert_eq!(specialty_for_name("Sunshine Family Center"), "Therapy");
/// ```
#[must_use]
pub fn specialty_for_name(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    SPECIALTY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(DEFAULT_SPECIALTY, |(_, tag)| *tag)
}

/// Uppercased first letters of the first two whitespace-separated tokens,
/// or `"T"` when the name has no tokens.
#[must_use]
pub fn initials_for_name(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "T".to_string()
    } else {
        initials
    }
}
