use crate::{
    Config,
    error::Result,
    model::{LocationCandidate, RawConditions},
    provider::openweather::OpenWeatherProvider,
    resolve::{GeoQuery, best_match},
    units::Units,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Geocoding candidates for the query, in the provider's order.
    async fn geocode(&self, query: &GeoQuery) -> Result<Vec<LocationCandidate>>;

    /// Current conditions at a coordinate; `None` when the provider returned no body.
    async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
        units: Units,
    ) -> Result<Option<RawConditions>>;

    /// Current conditions for one of the provider's well-known city ids.
    async fn current_conditions_by_city_id(
        &self,
        city_id: u64,
        units: Units,
    ) -> Result<Option<RawConditions>>;

    /// Geocodes the query and keeps the single best match.
    async fn resolve(&self, query: &GeoQuery) -> Result<Option<LocationCandidate>> {
        let candidates = self.geocode(query).await?;
        let best = best_match(&candidates, query).cloned();

        match &best {
            Some(found) => tracing::info!(
                city = %query.city,
                name = %found.name,
                state = ?found.region,
                country = ?found.country,
                candidates = candidates.len(),
                "Resolved city"
            ),
            None => tracing::info!(
                city = %query.city,
                candidates = candidates.len(),
                "No geocoding candidate matched"
            ),
        }

        Ok(best)
    }
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.require_api_key()?;
    OpenWeatherProvider::new(api_key.to_owned(), &config.openweather)
}
