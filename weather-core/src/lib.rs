//! Core library for the best-guess weather service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding best-match resolution
//! - Unit normalisation into Fahrenheit / mph
//! - The OpenWeather provider client
//! - Request orchestration and the response envelope
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod envelope;
pub mod error;
pub mod model;
pub mod provider;
pub mod resolve;
pub mod service;
pub mod units;

pub use config::{Config, ProviderConfig, ServerConfig};
pub use envelope::ServiceEnvelope;
pub use error::{Result, WeatherError};
pub use model::{CityQuery, LocationCandidate, NormalizedWeather, RawConditions};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use resolve::{GeoQuery, best_match};
pub use service::{WeatherOutcome, WeatherService};
pub use units::Units;
