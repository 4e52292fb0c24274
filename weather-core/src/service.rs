//! Best-guess current weather: resolve a bare city name, then fetch and
//! normalise its conditions.

use std::sync::Arc;

use crate::{
    envelope::ServiceEnvelope,
    error::WeatherError,
    model::{CityQuery, NormalizedWeather},
    provider::WeatherProvider,
    resolve::GeoQuery,
    units::Units,
};

/// Units always requested from the provider by the best-guess lookup.
pub const REQUEST_UNITS: Units = Units::Imperial;

/// Result of one best-guess lookup.
#[derive(Debug)]
pub enum WeatherOutcome {
    Found(NormalizedWeather),
    /// The query ran but no geocoding candidate matched the name.
    CityNotFound { city: String },
    /// A city was resolved but its conditions could not be fetched.
    ConditionsUnavailable {
        city: String,
        cause: Option<WeatherError>,
    },
    /// Any other failure, e.g. the geocoding call timing out.
    Failed(WeatherError),
}

impl From<WeatherOutcome> for ServiceEnvelope<NormalizedWeather> {
    fn from(outcome: WeatherOutcome) -> Self {
        match outcome {
            WeatherOutcome::Found(weather) => ServiceEnvelope::success(weather),
            WeatherOutcome::CityNotFound { city } => {
                ServiceEnvelope::not_found(format!("Unable to locate city {city}"))
            }
            WeatherOutcome::ConditionsUnavailable { city, cause } => {
                let message = format!("Unable to get current weather for city {city}");
                match cause {
                    Some(err) => {
                        ServiceEnvelope::failure(format!("{message} ({})", err.envelope_message()))
                    }
                    None => ServiceEnvelope::failure(message),
                }
            }
            WeatherOutcome::Failed(err) => ServiceEnvelope::failure(err.envelope_message()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Current weather for the city best matching `city`, searched worldwide
    /// without state or country hints.
    pub async fn best_guess_current_weather(&self, city: &CityQuery) -> WeatherOutcome {
        let query = GeoQuery::city(city.as_str());

        let location = match self.provider.resolve(&query).await {
            Ok(Some(location)) => location,
            Ok(None) => {
                return WeatherOutcome::CityNotFound {
                    city: city.to_string(),
                };
            }
            Err(err) => {
                if err.is_upstream_unavailable() {
                    tracing::warn!(%city, error = %err, "Geocoding unavailable");
                } else {
                    tracing::error!(%city, error = %err, "Geocoding failed");
                }
                return WeatherOutcome::Failed(err);
            }
        };

        let conditions = self
            .provider
            .current_conditions(location.latitude, location.longitude, REQUEST_UNITS)
            .await;

        match conditions {
            Ok(Some(raw)) => {
                tracing::debug!(
                    %city,
                    observed_at = ?raw.observed_at(),
                    "Fetched current conditions"
                );
                WeatherOutcome::Found(NormalizedWeather::normalize(
                    &raw,
                    REQUEST_UNITS,
                    location.region.as_deref(),
                    location.country.as_deref(),
                ))
            }
            Ok(None) => WeatherOutcome::ConditionsUnavailable {
                city: city.to_string(),
                cause: None,
            },
            Err(err) => {
                tracing::warn!(%city, error = %err, "Current conditions failed");
                WeatherOutcome::ConditionsUnavailable {
                    city: city.to_string(),
                    cause: Some(err),
                }
            }
        }
    }

    /// Current weather for one of the provider's well-known city ids.
    pub async fn current_weather_by_city_id(&self, city_id: u64) -> WeatherOutcome {
        match self
            .provider
            .current_conditions_by_city_id(city_id, REQUEST_UNITS)
            .await
        {
            Ok(Some(raw)) => {
                let country = raw.sys.as_ref().and_then(|s| s.country.clone());
                WeatherOutcome::Found(NormalizedWeather::normalize(
                    &raw,
                    REQUEST_UNITS,
                    None,
                    country.as_deref(),
                ))
            }
            Ok(None) => WeatherOutcome::ConditionsUnavailable {
                city: city_id.to_string(),
                cause: None,
            },
            Err(err) => {
                tracing::warn!(city_id, error = %err, "Current conditions by id failed");
                WeatherOutcome::Failed(err)
            }
        }
    }
}
