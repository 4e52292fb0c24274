//! Server initialization and routing

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use weather_core::{ServerConfig, WeatherService};

use crate::routes;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: WeatherService,
}

impl AppState {
    pub fn new(service: WeatherService) -> Arc<Self> {
        Arc::new(Self { service })
    }
}

/// Build the router.
///
/// The weather controller is mounted under both `/WeatherForecast` and
/// `/weatherforecast`; the front end calls the lower-case form. When a static
/// directory is configured, unmatched paths serve the single-page app.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let controller = Router::new()
        .route(
            "/GetBestGuessCityCurrentWeather",
            get(routes::best_guess_city_current_weather),
        )
        .route(
            "/GetCityCurrentWeatherById",
            get(routes::city_current_weather_by_id),
        )
        .route("/Text", get(routes::text));

    let router = Router::new()
        .nest("/WeatherForecast", controller.clone())
        .nest("/weatherforecast", controller)
        .route("/health", get(routes::health_check));

    let router = match &config.static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(routes::not_found),
    };

    let router = if config.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn start_server(state: Arc<AppState>, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = build_router(state, config);

    tracing::info!(
        %addr,
        cors = config.enable_cors,
        static_dir = ?config.static_dir,
        "Starting weather server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
