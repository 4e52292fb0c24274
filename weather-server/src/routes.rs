//! HTTP handlers for the weather endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use weather_core::{CityQuery, NormalizedWeather, ServiceEnvelope, WeatherError};

use crate::server::AppState;

type WeatherResponse = (StatusCode, Json<ServiceEnvelope<NormalizedWeather>>);

fn bad_request(err: WeatherError) -> WeatherResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ServiceEnvelope::failure(err.envelope_message())),
    )
}

fn query_rejected(rejection: QueryRejection) -> WeatherResponse {
    bad_request(WeatherError::Validation(rejection.body_text()))
}

#[derive(Debug, Deserialize)]
pub struct CityNameParams {
    #[serde(rename = "cityName", alias = "cityname", alias = "city_name")]
    pub city_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CityIdParams {
    #[serde(rename = "cityId", alias = "cityid", alias = "city_id")]
    pub city_id: Option<String>,
}

/// `GET /WeatherForecast/GetBestGuessCityCurrentWeather?cityName=...`
///
/// A blank name is rejected with 400 before any upstream call. Everything
/// else, including upstream failures, is a 200 carrying the envelope.
pub async fn best_guess_city_current_weather(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CityNameParams>, QueryRejection>,
) -> WeatherResponse {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return query_rejected(rejection),
    };
    let city = match CityQuery::parse(params.city_name.as_deref()) {
        Ok(city) => city,
        Err(err) => return bad_request(err),
    };

    let outcome = state.service.best_guess_current_weather(&city).await;
    (StatusCode::OK, Json(outcome.into()))
}

/// `GET /WeatherForecast/GetCityCurrentWeatherById?cityId=...`
pub async fn city_current_weather_by_id(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CityIdParams>, QueryRejection>,
) -> WeatherResponse {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return query_rejected(rejection),
    };
    let raw = params.city_id.unwrap_or_default();
    let Ok(city_id) = raw.trim().parse::<u64>() else {
        return bad_request(WeatherError::Validation(format!(
            "cityId must be a non-negative integer, got '{raw}'"
        )));
    };

    let outcome = state.service.current_weather_by_city_id(city_id).await;
    (StatusCode::OK, Json(outcome.into()))
}

pub async fn text() -> &'static str {
    "Hello world"
}

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "weather-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ServiceEnvelope::<NormalizedWeather>::failure("Not found")),
    )
}
