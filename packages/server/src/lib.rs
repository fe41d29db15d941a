#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the `ClearPath` dashboards.
//!
//! Serves simulated traffic and pollution zones, the mock AQI card, the
//! live air quality and traffic incident feeds, the static alert and
//! transit feeds, and the issue reporting flow with its leaderboard.
//! Accepted reports are persisted to `<CLEARPATH_DATA_DIR>/submissions.json`.

mod handlers;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use clearpath_feeds::{AirQualityClient, TrafficClient};
use clearpath_reports::{JsonFileStore, ReportService, SubmissionLog};
use clearpath_simulate::Simulator;
use thiserror::Error;

/// File under the data directory holding the submission store.
pub const SUBMISSIONS_FILE: &str = "submissions.json";

/// Errors that can occur while configuring the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or running the HTTP server failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Where the server listens and keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Directory holding the submission store.
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Reads `BIND_ADDR` (default `127.0.0.1`), `PORT` (default `8080`) and
    /// `CLEARPATH_DATA_DIR` (default `data`).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if `PORT` is set but not a valid port.
    pub fn from_env() -> Result<Self, ServerError> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ServerError::Config {
                message: format!("PORT must be a valid port number, got {raw:?}"),
            })?,
            Err(_) => 8080,
        };

        let data_dir = std::env::var("CLEARPATH_DATA_DIR")
            .map_or_else(|_| PathBuf::from("data"), PathBuf::from);

        Ok(Self {
            bind_addr,
            port,
            data_dir,
        })
    }

    /// Path of the submission store.
    #[must_use]
    pub fn submissions_path(&self) -> PathBuf {
        self.data_dir.join(SUBMISSIONS_FILE)
    }
}

/// Shared application state.
pub struct AppState {
    /// Mock data generator shared by all dashboard requests.
    pub simulator: Mutex<Simulator>,
    /// Accepted submissions, read by the profile and leaderboard.
    pub log: Arc<SubmissionLog>,
    /// Report flow. `None` when no label detector is configured.
    pub reports: Option<ReportService>,
    /// Live air quality. `None` without `OPENWEATHER_API_KEY`.
    pub air_quality: Option<AirQualityClient>,
    /// Live traffic incidents. `None` without `TOMTOM_API_KEY`.
    pub traffic: Option<TrafficClient>,
}

impl AppState {
    /// Builds the state for `config`, configuring each optional service
    /// from the environment. Missing keys disable the matching endpoints
    /// rather than failing startup.
    #[must_use]
    pub fn from_env(config: &ServerConfig) -> Self {
        let store_path = config.submissions_path();
        log::info!("Using submission store {}", store_path.display());
        let log = Arc::new(SubmissionLog::new(Box::new(JsonFileStore::new(store_path))));

        let reports = match clearpath_vision::create_detector_from_env() {
            Ok(detector) => Some(ReportService::new(Arc::from(detector), log.clone())),
            Err(e) => {
                log::warn!("Report submission disabled: {e}");
                None
            }
        };

        let air_quality = AirQualityClient::from_env()
            .inspect_err(|e| log::warn!("Live air quality disabled: {e}"))
            .ok();

        let traffic = TrafficClient::from_env()
            .inspect_err(|e| log::warn!("Live traffic incidents disabled: {e}"))
            .ok();

        Self {
            simulator: Mutex::new(Simulator::from_entropy()),
            log,
            reports,
            air_quality,
            traffic,
        }
    }

    fn simulator(&self) -> std::sync::MutexGuard<'_, Simulator> {
        self.simulator
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/zones/traffic", web::get().to(handlers::traffic_zones))
            .route("/zones/pollution", web::get().to(handlers::pollution_zones))
            .route("/aqi", web::get().to(handlers::aqi))
            .route("/aqi/observed", web::get().to(handlers::observed_aqi))
            .route("/traffic/incidents", web::get().to(handlers::traffic_incidents))
            .route("/alerts/{feed}", web::get().to(handlers::alerts))
            .route("/transit", web::get().to(handlers::transit))
            .route("/leaderboard", web::get().to(handlers::leaderboard))
            .route("/profile", web::get().to(handlers::profile))
            .route("/rewards", web::get().to(handlers::rewards))
            .route("/reports/recent", web::get().to(handlers::recent_reports))
            .route("/reports", web::post().to(handlers::submit_report)),
    );
}

/// Starts the `ClearPath` API server.
///
/// Reads [`ServerConfig`] and [`AppState`] from the environment and runs
/// the Actix-Web HTTP server until it is stopped. The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns [`ServerError`] if the configuration is invalid or the server
/// fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;
    let state = web::Data::new(AppState::from_env(&config));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(handlers::MAX_REPORT_BODY_BYTES))
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
