use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, WeatherError>;

/// Failures surfaced by the weather core.
///
/// A city that simply could not be found is not an error; see
/// [`crate::service::WeatherOutcome::CityNotFound`].
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("{0}")]
    Validation(String),

    #[error("OpenWeather {endpoint} request did not complete within the timeout")]
    Timeout { endpoint: &'static str },

    #[error("Failed to reach OpenWeather {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    UpstreamStatus {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse OpenWeather {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl WeatherError {
    /// Stable name of the failure kind, reported to callers alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::Validation(_) => "ValidationError",
            WeatherError::Timeout { .. } => "Timeout",
            WeatherError::Transport { .. } => "TransportError",
            WeatherError::UpstreamStatus { .. } => "UpstreamStatusError",
            WeatherError::Parse { .. } => "ParseError",
        }
    }

    /// True for failures caused by the provider being slow or unreachable.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(
            self,
            WeatherError::Timeout { .. }
                | WeatherError::Transport { .. }
                | WeatherError::UpstreamStatus { .. }
        )
    }

    pub(crate) fn from_reqwest(endpoint: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout { endpoint }
        } else {
            WeatherError::Transport {
                endpoint,
                source: err,
            }
        }
    }

    /// Formats the error the way the envelope reports unexpected failures.
    pub fn envelope_message(&self) -> String {
        format!("Error {}: {}", self.kind(), self)
    }
}
