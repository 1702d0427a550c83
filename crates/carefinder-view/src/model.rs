//! View models derived from a [`ProviderRecord`].

use carefinder_core::{ProviderRecord, Rating, Review};

const MAX_STARS: u8 = 5;
const NO_REVIEWS_TEXT: &str = "No reviews available.";
const DEFAULT_PHONE: &str = "Contact for details";

/// Star breakdown for a rating out of five.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    /// Full stars for the whole part, a half star when the fraction is at
    /// least 0.5, empty stars for the rest. Values outside 0..=5 are clamped.
    ///
    /// ```
    /// use carefinder_view::StarRating;
    ///
    /// let stars = StarRating::from_rating(3.6);
    /// assert_eq!((stars.full, stars.half, stars.empty), (3, true, 1));
    /// ```
    #[must_use]
    pub fn from_rating(value: f64) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, f64::from(MAX_STARS))
        } else {
            0.0
        };
        // Bounded to 0..=5 above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let full = value.floor() as u8;
        let half = full < MAX_STARS && value.fract() >= 0.5;
        let empty = MAX_STARS - full - u8::from(half);
        Self { full, half, empty }
    }

    /// Text form, e.g. `★★★½☆`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = "★".repeat(usize::from(self.full));
        if self.half {
            out.push('½');
        }
        out.push_str(&"☆".repeat(usize::from(self.empty)));
        out
    }
}

/// `"x.y miles away"`.
#[must_use]
pub fn distance_text(miles: f64) -> String {
    format!("{miles:.1} miles away")
}

/// Rating with its provenance, e.g. `"4.6"` or `"4.2 (estimated)"`.
#[must_use]
pub fn rating_text(rating: Option<&Rating>) -> String {
    match rating {
        Some(r) if r.is_placeholder() => format!("{:.1} (estimated)", r.value),
        Some(r) => format!("{:.1}", r.value),
        None => "No rating".to_string(),
    }
}

/// One row in the result list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    pub initials: String,
    pub specialty: String,
    pub distance: String,
    pub stars: Option<StarRating>,
    pub rating: String,
    pub review_count: u32,
}

impl From<&ProviderRecord> for ListRow {
    fn from(p: &ProviderRecord) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            initials: p.initials.clone(),
            specialty: p.specialty_tag.clone(),
            distance: distance_text(p.distance_miles),
            stars: p.rating.map(|r| StarRating::from_rating(r.value)),
            rating: rating_text(p.rating.as_ref()),
            review_count: p.review_count,
        }
    }
}

/// Content of the popup attached to a provider marker.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoContent {
    pub title: String,
    pub specialty: String,
    pub address: String,
    pub distance: String,
    pub rating: String,
}

impl From<&ProviderRecord> for InfoContent {
    fn from(p: &ProviderRecord) -> Self {
        Self {
            title: p.name.clone(),
            specialty: p.specialty_tag.clone(),
            address: p.address.clone(),
            distance: distance_text(p.distance_miles),
            rating: rating_text(p.rating.as_ref()),
        }
    }
}

/// What the primary contact button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactAction {
    /// Dial the digits of the listed phone number.
    Call { digits: String },
    /// Open the provider's website.
    Website { url: String },
    /// Neither a phone number nor a website is known.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub author: String,
    pub date: String,
    pub stars: StarRating,
    pub text: String,
}

impl From<&Review> for ReviewView {
    fn from(r: &Review) -> Self {
        Self {
            author: r.author.clone(),
            date: r.date.clone(),
            stars: StarRating::from_rating(r.rating),
            text: r.text.clone(),
        }
    }
}

/// The expanded detail panel for the selected provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub id: String,
    pub name: String,
    pub initials: String,
    pub specialty: String,
    pub stars: Option<StarRating>,
    pub rating: String,
    pub review_count: u32,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub distance: String,
    pub contact: ContactAction,
    pub reviews: Vec<ReviewView>,
    /// Shown instead of the review list when there are no reviews.
    pub reviews_placeholder: Option<&'static str>,
}

impl From<&ProviderRecord> for DetailPanel {
    fn from(p: &ProviderRecord) -> Self {
        let contact = if p.phone == DEFAULT_PHONE {
            p.website
                .clone()
                .map_or(ContactAction::None, |url| ContactAction::Website { url })
        } else {
            ContactAction::Call {
                digits: p.phone.chars().filter(char::is_ascii_digit).collect(),
            }
        };
        let reviews: Vec<ReviewView> = p.reviews.iter().map(ReviewView::from).collect();

        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            initials: p.initials.clone(),
            specialty: p.specialty_tag.clone(),
            stars: p.rating.map(|r| StarRating::from_rating(r.value)),
            rating: rating_text(p.rating.as_ref()),
            review_count: p.review_count,
            phone: p.phone.clone(),
            website: p.website.clone(),
            address: p.address.clone(),
            distance: distance_text(p.distance_miles),
            contact,
            reviews_placeholder: reviews.is_empty().then_some(NO_REVIEWS_TEXT),
            reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use carefinder_core::Coordinate;

    use super::*;

    fn record() -> ProviderRecord {
        ProviderRecord {
            id: "p1".into(),
            name: "Dr. Ana Ruiz".into(),
            specialty_tag: "Therapy".into(),
            coordinate: Coordinate::new(37.0, -122.0).unwrap(),
            distance_miles: 2.0,
            rating: Some(Rating::placeholder(4.2)),
            review_count: 9,
            phone: "(415) 555-0100".into(),
            website: Some("https://example.org".into()),
            address: "1 Main St".into(),
            initials: "DA".into(),
            reviews: vec![Review {
                author: "Kim".into(),
                date: "Recent".into(),
                rating: 5.0,
                text: "Great".into(),
            }],
        }
    }

    #[test]
    fn star_breakdown() {
        let cases = [
            (0.0, (0, false, 5)),
            (3.4, (3, false, 2)),
            (3.5, (3, true, 1)),
            (4.99, (4, true, 0)),
            (5.0, (5, false, 0)),
            (7.0, (5, false, 0)),
            (-1.0, (0, false, 5)),
        ];
        for (value, (full, half, empty)) in cases {
            let stars = StarRating::from_rating(value);
            assert_eq!((stars.full, stars.half, stars.empty), (full, half, empty), "{value}");
        }
        assert_eq!(StarRating::from_rating(2.5).render(), "★★½☆☆");
    }

    #[test]
    fn distance_text_has_one_decimal() {
        assert_eq!(distance_text(2.0), "2.0 miles away");
        assert_eq!(distance_text(12.34), "12.3 miles away");
    }

    #[test]
    fn placeholder_rating_is_labelled() {
        assert_eq!(rating_text(Some(&Rating::placeholder(4.2))), "4.2 (estimated)");
        assert_eq!(rating_text(Some(&Rating::upstream(4.0))), "4.0");
        assert_eq!(rating_text(None), "No rating");
    }

    #[test]
    fn detail_panel_prefers_phone_contact() {
        let panel = DetailPanel::from(&record());
        assert_eq!(
            panel.contact,
            ContactAction::Call {
                digits: "4155550100".into()
            }
        );
        assert_eq!(panel.reviews.len(), 1);
        assert_eq!(panel.reviews_placeholder, None);
    }

    #[test]
    fn detail_panel_falls_back_to_website() {
        let mut p = record();
        p.phone = "Contact for details".into();
        p.reviews.clear();
        let panel = DetailPanel::from(&p);
        assert_eq!(
            panel.contact,
            ContactAction::Website {
                url: "https://example.org".into()
            }
        );
        assert_eq!(panel.reviews_placeholder, Some("No reviews available."));
    }
}
