#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for `ClearPath`.
//!
//! Prints simulated dashboard data and the fixed feeds as JSON, scores
//! label sets, submits reports from image files into the same store the
//! server uses, and starts the API server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use clearpath_environment_models::GeoPoint;
use clearpath_feeds::AlertFeed;
use clearpath_reports::providers::{
    FileCapture, FixedLocation, LocationProvider, NoLocation, ReportLocation,
};
use clearpath_reports::submission_log::DEFAULT_RECENT_LIMIT;
use clearpath_reports::{JsonFileStore, ReportService, SubmissionLog, SubmissionOutcome};
use clearpath_reports_models::{IssueType, ReportDraft};
use clearpath_server::ServerConfig;
use clearpath_simulate::Simulator;
use clearpath_vision::LabelScore;

#[derive(Parser)]
#[command(name = "clearpath", about = "ClearPath city dashboard toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Center {
    /// Latitude of the map center
    #[arg(long, default_value = "51.505", allow_hyphen_values = true)]
    lat: f64,
    /// Longitude of the map center
    #[arg(long, default_value = "-0.09", allow_hyphen_values = true)]
    lng: f64,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

impl Center {
    const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    fn simulator(&self) -> Simulator {
        self.seed.map_or_else(Simulator::from_entropy, Simulator::seeded)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print simulated traffic zones around a point
    Traffic {
        #[command(flatten)]
        center: Center,
    },
    /// Print simulated pollution zones around a point
    Pollution {
        #[command(flatten)]
        center: Center,
    },
    /// Print an AQI reading (simulated unless `--live`)
    Aqi {
        #[command(flatten)]
        center: Center,
        /// Fetch the observed reading from `OpenWeatherMap` instead
        #[arg(long)]
        live: bool,
    },
    /// Score a reference phrase against a set of image labels
    Score {
        /// Reference phrase, e.g. "Faulty Street Light"
        phrase: String,
        /// Labels returned by the detector
        labels: Vec<String>,
    },
    /// Submit a report from an image file
    Report {
        /// Issue type (e.g. `POTHOLE`, `streetlight`)
        #[arg(long)]
        issue_type: IssueType,
        /// Path to the photo
        #[arg(long)]
        image: PathBuf,
        /// Description; required for `OTHER`
        #[arg(long, default_value = "")]
        description: String,
        /// `lat,lng` or a free-text address
        #[arg(long, allow_hyphen_values = true)]
        location: Option<String>,
        /// Name shown on the leaderboard
        #[arg(long)]
        reporter: Option<String>,
    },
    /// Print the fixed alert feeds (all of them unless one is named)
    Alerts {
        /// `traffic`, `environmental` or `infrastructure`
        feed: Option<AlertFeed>,
    },
    /// Print the transit departures board
    Transit,
    /// List the newest accepted reports
    Recent {
        /// Maximum number of reports
        #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
    /// Print the leaderboard
    Leaderboard,
    /// Print points and recent reports for a reporter (everyone if omitted)
    Profile {
        /// Reporter name as submitted
        #[arg(long)]
        reporter: Option<String>,
        /// Maximum number of recent reports
        #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
    /// List the rewards catalog
    Rewards {
        /// Only rewards this many points can claim
        #[arg(long)]
        points: Option<u64>,
    },
    /// Start the API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Traffic { center } => {
            let zones = center.simulator().traffic_zones(center.point());
            print_json(&zones)?;
        }
        Commands::Pollution { center } => {
            let zones = center.simulator().pollution_zones(center.point());
            print_json(&zones)?;
        }
        Commands::Aqi { center, live } => {
            if live {
                let client = clearpath_feeds::AirQualityClient::from_env()?;
                print_json(&client.observe(center.point()).await?)?;
            } else {
                print_json(&center.simulator().aqi_reading(chrono::Utc::now()))?;
            }
        }
        Commands::Score { phrase, labels } => {
            let score = LabelScore::compute(&phrase, &labels);
            print_json(&serde_json::json!({
                "keywords": score.keywords,
                "matched": score.matched,
                "confidence": score.confidence,
                "accepted": score.is_accepted(),
            }))?;
        }
        Commands::Report {
            issue_type,
            image,
            description,
            location,
            reporter,
        } => {
            let log = open_log()?;
            let detector = clearpath_vision::create_detector_from_env()?;
            let service = ReportService::new(Arc::from(detector), log);

            let draft = ReportDraft {
                issue_type,
                description,
                reporter,
            };
            let location = location_provider(location.as_deref());

            match service
                .submit(&draft, &FileCapture::new(image), location.as_ref())
                .await
            {
                Ok(SubmissionOutcome::Accepted { submission, score }) => {
                    log::info!(
                        "Accepted with confidence {:.1}, +{} points",
                        score.confidence,
                        submission.points
                    );
                    print_json(&submission)?;
                }
                Ok(SubmissionOutcome::Rejected { score, message }) => {
                    println!("{message} (confidence {:.1})", score.confidence);
                }
                Err(e) => {
                    log::error!("Report failed: {e}");
                    return Err(e.user_message().into());
                }
            }
        }
        Commands::Alerts { feed } => {
            let now = chrono::Utc::now();
            let mut feeds = serde_json::Map::new();
            for feed in feed.as_ref().map_or(AlertFeed::all(), std::slice::from_ref) {
                let alerts = match feed {
                    AlertFeed::Traffic => {
                        serde_json::to_value(clearpath_feeds::traffic_alerts(now))?
                    }
                    AlertFeed::Environmental => {
                        serde_json::to_value(clearpath_feeds::environmental_alerts(now))?
                    }
                    AlertFeed::Infrastructure => {
                        serde_json::to_value(clearpath_feeds::infrastructure_updates(now))?
                    }
                };
                feeds.insert(feed.to_string(), alerts);
            }
            print_json(&feeds)?;
        }
        Commands::Transit => {
            print_json(&clearpath_feeds::transit_schedule())?;
        }
        Commands::Recent { limit } => {
            print_json(&open_log()?.recent(limit)?)?;
        }
        Commands::Leaderboard => {
            let board = clearpath_reports::leaderboard(&open_log()?.all()?);
            println!("{:<6}{:<24}{:>8}{:>10}", "RANK", "NAME", "POINTS", "REPORTS");
            println!("{}", "-".repeat(48));
            for entry in &board {
                println!(
                    "{:<6}{:<24}{:>8}{:>10}",
                    entry.rank, entry.name, entry.points, entry.contribution_count
                );
            }
        }
        Commands::Profile { reporter, limit } => {
            let submissions = open_log()?.all()?;
            print_json(&clearpath_reports::profile(
                &submissions,
                reporter.as_deref(),
                limit,
            ))?;
        }
        Commands::Rewards { points } => {
            let catalog = clearpath_reports::rewards(chrono::Utc::now().date_naive());
            match points {
                Some(points) => {
                    print_json(&clearpath_reports::rewards::affordable(&catalog, points))?;
                }
                None => print_json(&catalog)?,
            }
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so run it on its own
            // thread instead of nesting it inside tokio's.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(clearpath_server::run_server())
            })
            .await??;
        }
    }

    Ok(())
}

fn open_log() -> Result<Arc<SubmissionLog>, Box<dyn std::error::Error>> {
    let path = ServerConfig::from_env()?.submissions_path();
    log::debug!("Using submission store {}", path.display());
    Ok(Arc::new(SubmissionLog::new(Box::new(JsonFileStore::new(
        path,
    )))))
}

/// `"lat,lng"` becomes coordinates; anything else non-blank is an address.
fn location_provider(raw: Option<&str>) -> Box<dyn LocationProvider> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Box::new(NoLocation);
    };

    let coordinates = raw.split_once(',').and_then(|(lat, lng)| {
        Some(GeoPoint::new(
            lat.trim().parse().ok()?,
            lng.trim().parse().ok()?,
        ))
    });

    Box::new(FixedLocation(coordinates.map_or_else(
        || ReportLocation::Address(raw.to_string()),
        ReportLocation::Coordinates,
    )))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn location_parses_coordinates_or_address() {
        let fix = location_provider(Some("51.5, -0.1")).locate().await.unwrap();
        assert_eq!(fix, ReportLocation::Coordinates(GeoPoint::new(51.5, -0.1)));

        let fix = location_provider(Some("Oak Street, Springfield"))
            .locate()
            .await
            .unwrap();
        assert_eq!(
            fix,
            ReportLocation::Address("Oak Street, Springfield".to_string())
        );

        assert!(location_provider(Some("  ")).locate().await.is_err());
        assert!(location_provider(None).locate().await.is_err());
    }

    #[test]
    fn cli_parses_report_arguments() {
        let cli = Cli::try_parse_from([
            "clearpath",
            "report",
            "--issue-type",
            "pothole",
            "--image",
            "photo.jpg",
            "--location",
            "-33.86,151.2",
        ])
        .unwrap();

        let Commands::Report {
            issue_type,
            location,
            description,
            ..
        } = cli.command
        else {
            panic!("expected report");
        };
        assert_eq!(issue_type, IssueType::Pothole);
        assert_eq!(location.as_deref(), Some("-33.86,151.2"));
        assert!(description.is_empty());
    }

    #[test]
    fn unknown_issue_type_is_rejected() {
        let result = Cli::try_parse_from([
            "clearpath",
            "report",
            "--issue-type",
            "volcano",
            "--image",
            "photo.jpg",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn alerts_feed_is_optional() {
        let cli = Cli::try_parse_from(["clearpath", "alerts", "Environmental"]).unwrap();
        let Commands::Alerts { feed } = cli.command else {
            panic!("expected alerts");
        };
        assert_eq!(feed, Some(AlertFeed::Environmental));

        let cli = Cli::try_parse_from(["clearpath", "alerts"]).unwrap();
        assert!(matches!(cli.command, Commands::Alerts { feed: None }));
    }

    #[test]
    fn profile_defaults_to_recent_limit() {
        let cli = Cli::try_parse_from(["clearpath", "profile", "--reporter", "Ana"]).unwrap();
        let Commands::Profile { reporter, limit } = cli.command else {
            panic!("expected profile");
        };
        assert_eq!(reporter.as_deref(), Some("Ana"));
        assert_eq!(limit, DEFAULT_RECENT_LIMIT);
    }

    #[test]
    fn seeded_center_is_reproducible() {
        let cli = Cli::try_parse_from(["clearpath", "traffic", "--seed", "42"]).unwrap();
        let Commands::Traffic { center } = cli.command else {
            panic!("expected traffic");
        };
        assert_eq!(
            center.simulator().traffic_zones(center.point()),
            center.simulator().traffic_zones(center.point())
        );
    }
}
