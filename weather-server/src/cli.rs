use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing_subscriber::EnvFilter;
use weather_core::{
    CityQuery, Config, NormalizedWeather, ServiceEnvelope, WeatherService, provider_from_config,
};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Best-guess city weather service")]
pub struct Cli {
    /// Path to the configuration file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Override the configured port.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Store the OpenWeather API key.
    Configure,

    /// Look up the current weather for a city once and print the response.
    Show {
        /// City name, without state or country.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let mut config = Config::load_from(&path)?;
        init_tracing(&config.server.log_level);

        match self.command {
            Command::Serve { port } => {
                if let Some(port) = port {
                    config.server.port = port;
                }
                let service = build_service(&config)?;
                server::start_server(AppState::new(service), &config.server).await
            }
            Command::Configure => {
                let api_key = Password::new("OpenWeather API key:")
                    .with_display_mode(PasswordDisplayMode::Masked)
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                // Environment overrides must not be persisted.
                let mut on_disk = Config::from_file(&path)?;
                on_disk.set_api_key(api_key.trim().to_string());
                on_disk.save_to(&path)?;

                println!("Saved configuration to {}", path.display());
                Ok(())
            }
            Command::Show { city } => {
                let city = CityQuery::parse(Some(city.as_str()))?;
                let service = build_service(&config)?;

                let envelope: ServiceEnvelope<NormalizedWeather> =
                    service.best_guess_current_weather(&city).await.into();

                println!("{}", serde_json::to_string_pretty(&envelope)?);
                Ok(())
            }
        }
    }
}

fn build_service(config: &Config) -> anyhow::Result<WeatherService> {
    let provider = provider_from_config(config)?;
    Ok(WeatherService::new(Arc::new(provider)))
}

/// Logs go to stderr so `show` output stays machine-readable.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
