/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

const FAHRENHEIT_DEGREES_PER_CELSIUS: f64 = 1.8;
const FAHRENHEIT_AT_ZERO_KELVIN: f64 = -459.67;
const FAHRENHEIT_AT_ZERO_CELSIUS: f64 = 32.0;

/// Unit system requested from the provider.
///
/// Standard reports Kelvin and metres/second, Metric reports Celsius and
/// metres/second, Imperial reports Fahrenheit and miles/hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Standard,
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Standard, Units::Metric, Units::Imperial]
    }

    /// Converts a temperature reported in this unit system to degrees Fahrenheit.
    pub fn temperature_to_fahrenheit(self, value: f64) -> f64 {
        match self {
            Units::Standard => kelvin_to_fahrenheit(value),
            Units::Metric => celsius_to_fahrenheit(value),
            Units::Imperial => value,
        }
    }

    /// Converts a wind speed reported in this unit system to the canonical mph value.
    ///
    /// Standard divides by [`KM_PER_MILE`] twice, Metric once.
    pub fn wind_speed_to_mph(self, value: f64) -> f64 {
        match self {
            Units::Standard => value / KM_PER_MILE / KM_PER_MILE,
            Units::Metric => value / KM_PER_MILE,
            Units::Imperial => value,
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: standard, metric, imperial."
            )),
        }
    }
}

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    kelvin * FAHRENHEIT_DEGREES_PER_CELSIUS + FAHRENHEIT_AT_ZERO_KELVIN
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * FAHRENHEIT_DEGREES_PER_CELSIUS + FAHRENHEIT_AT_ZERO_CELSIUS
}

pub fn fahrenheit_to_kelvin(fahrenheit: f64) -> f64 {
    (fahrenheit - FAHRENHEIT_AT_ZERO_KELVIN) / FAHRENHEIT_DEGREES_PER_CELSIUS
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - FAHRENHEIT_AT_ZERO_CELSIUS) / FAHRENHEIT_DEGREES_PER_CELSIUS
}
