use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config::ProviderConfig,
    error::{Result, WeatherError},
    model::{LocationCandidate, RawConditions},
    resolve::GeoQuery,
    units::Units,
};

use super::WeatherProvider;

const GEOCODE_PATH: &str = "geo/1.0/direct";
const WEATHER_PATH: &str = "data/2.5/weather";

const GEOCODE_ENDPOINT: &str = "geocoding";
const WEATHER_ENDPOINT: &str = "current weather";

/// Client for the OpenWeather geocoding and current-weather APIs.
///
/// Holds one shared HTTP client; every call is bounded by the configured timeout.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    geocode_limit: u8,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .field("geocode_limit", &self.geocode_limit)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &ProviderConfig) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            geocode_limit: config.geocode_limit,
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, ?params, "Calling OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::from_reqwest(endpoint, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::from_reqwest(endpoint, e))?;

        if !status.is_success() {
            tracing::warn!(%status, "OpenWeather {endpoint} request failed");
            return Err(WeatherError::UpstreamStatus {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Parse { endpoint, source })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, query: &GeoQuery) -> Result<Vec<LocationCandidate>> {
        let params = [
            ("q", query.to_query_string()),
            ("limit", self.geocode_limit.to_string()),
        ];

        let parsed: Option<Vec<LocationCandidate>> =
            self.get_json(GEOCODE_ENDPOINT, GEOCODE_PATH, &params).await?;

        Ok(parsed.unwrap_or_default())
    }

    async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
        units: Units,
    ) -> Result<Option<RawConditions>> {
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("units", units.to_string()),
        ];

        self.get_json(WEATHER_ENDPOINT, WEATHER_PATH, &params).await
    }

    async fn current_conditions_by_city_id(
        &self,
        city_id: u64,
        units: Units,
    ) -> Result<Option<RawConditions>> {
        let params = [("id", city_id.to_string()), ("units", units.to_string())];

        self.get_json(WEATHER_ENDPOINT, WEATHER_PATH, &params).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        let config = ProviderConfig {
            base_url: server.uri(),
            timeout_secs: 1,
            ..Default::default()
        };
        OpenWeatherProvider::new("TEST_KEY".into(), &config).unwrap()
    }

    #[tokio::test]
    async fn geocode_sends_query_limit_and_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Detroit,,"))
            .and(query_param("limit", "5"))
            .and(query_param("appid", "TEST_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "name": "Detroit",
                    "lat": 42.33,
                    "lon": -83.05,
                    "country": "US",
                    "state": "Michigan"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = provider_for(&server)
            .geocode(&GeoQuery::city("Detroit"))
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].latitude, 42.33);
        assert_eq!(candidates[0].longitude, -83.05);
    }

    #[tokio::test]
    async fn geocode_empty_array_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let resolved = provider_for(&server)
            .resolve(&GeoQuery::city("Nonexistent City"))
            .await
            .unwrap();

        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn geocode_timeout_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .geocode(&GeoQuery::city("Detroit"))
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Timeout { endpoint: "geocoding" }));
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .geocode(&GeoQuery::city("Detroit"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "UpstreamStatusError");
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .geocode(&GeoQuery::city("Detroit"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "ParseError");
    }

    #[tokio::test]
    async fn current_conditions_sends_coordinates_and_units() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "42.33"))
            .and(query_param("lon", "-83.05"))
            .and(query_param("units", "imperial"))
            .and(query_param("appid", "TEST_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "coord": {"lon": -83.05, "lat": 42.33},
                "weather": [
                    {"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}
                ],
                "base": "stations",
                "main": {
                    "temp": 20.17,
                    "feels_like": 6.94,
                    "temp_min": 18.0,
                    "temp_max": 22.0,
                    "pressure": 1020,
                    "humidity": 60
                },
                "visibility": 10000,
                "wind": {"speed": 12.57, "deg": 270},
                "clouds": {"all": 0},
                "dt": 1700000000,
                "sys": {
                    "type": 2,
                    "id": 2006979,
                    "country": "US",
                    "sunrise": 1699963000,
                    "sunset": 1699999000
                },
                "timezone": -18000,
                "id": 4990729,
                "name": "Detroit",
                "cod": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = provider_for(&server)
            .current_conditions(42.33, -83.05, Units::Imperial)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(raw.name.as_deref(), Some("Detroit"));
        assert_eq!(raw.id, 4990729);
        assert_eq!(raw.main.as_ref().map(|m| m.temp), Some(20.17));
        assert_eq!(raw.wind.as_ref().map(|w| w.speed), Some(12.57));
        assert_eq!(raw.weather[0].description.as_deref(), Some("clear sky"));
    }

    #[tokio::test]
    async fn null_conditions_body_is_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let raw = provider_for(&server)
            .current_conditions(1.0, 2.0, Units::Metric)
            .await
            .unwrap();

        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn conditions_by_city_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("id", "4990729"))
            .and(query_param("units", "standard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": {"temp": 273.15, "feels_like": 270.0},
                "id": 4990729,
                "name": "Detroit"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = provider_for(&server)
            .current_conditions_by_city_id(4990729, Units::Standard)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(raw.id, 4990729);
        assert!(raw.weather.is_empty());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let provider =
            OpenWeatherProvider::new("SECRET".into(), &ProviderConfig::default()).unwrap();
        assert!(!format!("{provider:?}").contains("SECRET"));
    }
}
