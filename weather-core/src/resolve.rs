//! Best-match selection over geocoding candidates.
//!
//! The geocoder accepts aliases ("MI" and "Michigan", "US" and "USA") but
//! reports canonical names, and when the query does not use its canonical
//! vocabulary it appends loosely related places in no useful order. Matching
//! therefore goes from most to least specific and keeps the provider's order
//! only within a tier.

use crate::model::LocationCandidate;

/// Optional disambiguation hints sent along with the city name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoQuery {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl GeoQuery {
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// `city,state,country` with empty parts kept, as the geocoder expects.
    pub fn to_query_string(&self) -> String {
        format!("{},{},{}", self.city, self.state, self.country)
    }
}

/// Picks the first candidate matching city, state and country; failing that
/// city and state; failing that city alone.
///
/// A same-named city in another country is accepted at the last tier.
pub fn best_match<'a>(
    candidates: &'a [LocationCandidate],
    query: &GeoQuery,
) -> Option<&'a LocationCandidate> {
    let name_matches = |c: &LocationCandidate| eq_no_case(&c.name, &query.city);
    let region_matches = |c: &LocationCandidate| {
        c.region
            .as_deref()
            .is_some_and(|region| eq_no_case(region, &query.state))
    };
    let country_matches = |c: &LocationCandidate| {
        c.country
            .as_deref()
            .is_some_and(|country| eq_no_case(country, &query.country))
    };

    candidates
        .iter()
        .find(|c| name_matches(c) && region_matches(c) && country_matches(c))
        .or_else(|| {
            candidates
                .iter()
                .find(|c| name_matches(c) && region_matches(c))
        })
        .or_else(|| candidates.iter().find(|c| name_matches(c)))
}

fn eq_no_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
