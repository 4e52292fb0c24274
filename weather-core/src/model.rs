use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    error::{Result, WeatherError},
    units::Units,
};

/// A validated, non-blank city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(WeatherError::Validation(
                "cityName must not be blank".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One geocoding match returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "state")]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, rename = "lat")]
    pub latitude: f64,
    #[serde(default, rename = "lon")]
    pub longitude: f64,
    #[serde(default)]
    pub local_names: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
    #[serde(default)]
    pub gust: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SunTimes {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// Current conditions as reported by the provider, in the requested unit system.
///
/// Absent sections deserialize to their defaults, matching how the provider
/// omits blocks it has no data for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConditions {
    #[serde(default)]
    pub coord: Option<Coordinates>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub main: Option<Temperatures>,
    #[serde(default)]
    pub visibility: f64,
    #[serde(default)]
    pub wind: Option<Wind>,
    #[serde(default)]
    pub clouds: Option<Clouds>,
    #[serde(default)]
    pub dt: i64,
    #[serde(default)]
    pub sys: Option<SunTimes>,
    #[serde(default)]
    pub timezone: i64,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cod: i32,
}

impl RawConditions {
    /// Time the provider calculated these conditions.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }
}

/// Current weather for one city, always in Fahrenheit and miles per hour.
///
/// Built only through [`NormalizedWeather::normalize`], which converts from
/// whatever unit system the provider was asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedWeather {
    city_name: Option<String>,
    state_name: Option<String>,
    country_id: Option<String>,
    city_code: u64,
    conditions_description: Option<String>,
    conditions_standard_id: i32,
    #[serde(rename = "temperatureActualFarenheit")]
    temperature_actual_fahrenheit: f64,
    #[serde(rename = "temperatureFeelsLikeFarenheit")]
    temperature_feels_like_fahrenheit: f64,
    current_wind_speed_mph: f64,
}

impl NormalizedWeather {
    pub fn normalize(
        raw: &RawConditions,
        units: Units,
        region: Option<&str>,
        country: Option<&str>,
    ) -> Self {
        let (conditions_description, conditions_standard_id) = raw
            .weather
            .first()
            .map(|c| (c.description.clone(), c.id))
            .unwrap_or_default();

        let main = raw.main.clone().unwrap_or_default();
        let wind_speed = raw.wind.as_ref().map(|w| w.speed).unwrap_or_default();

        Self {
            city_name: raw.name.clone(),
            state_name: region.map(str::to_string),
            country_id: country.map(str::to_string),
            city_code: raw.id,
            conditions_description,
            conditions_standard_id,
            temperature_actual_fahrenheit: units.temperature_to_fahrenheit(main.temp),
            temperature_feels_like_fahrenheit: units.temperature_to_fahrenheit(main.feels_like),
            current_wind_speed_mph: units.wind_speed_to_mph(wind_speed),
        }
    }

    pub fn city_name(&self) -> Option<&str> {
        self.city_name.as_deref()
    }

    pub fn state_name(&self) -> Option<&str> {
        self.state_name.as_deref()
    }

    pub fn country_id(&self) -> Option<&str> {
        self.country_id.as_deref()
    }

    pub fn city_code(&self) -> u64 {
        self.city_code
    }

    pub fn conditions_description(&self) -> Option<&str> {
        self.conditions_description.as_deref()
    }

    pub fn conditions_standard_id(&self) -> i32 {
        self.conditions_standard_id
    }

    pub fn temperature_actual_fahrenheit(&self) -> f64 {
        self.temperature_actual_fahrenheit
    }

    pub fn temperature_feels_like_fahrenheit(&self) -> f64 {
        self.temperature_feels_like_fahrenheit
    }

    pub fn current_wind_speed_mph(&self) -> f64 {
        self.current_wind_speed_mph
    }
}
