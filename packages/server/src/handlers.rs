//! HTTP handler functions for the `ClearPath` API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use chrono::Utc;
use clearpath_environment_models::GeoPoint;
use clearpath_feeds::AlertFeed;
use clearpath_reports::{ReportError, SubmissionOutcome};
use clearpath_reports::providers::{
    FixedLocation, LocationProvider, NoLocation, ReportLocation, StaticCapture,
};
use clearpath_reports::submission_log::DEFAULT_RECENT_LIMIT;
use clearpath_reports_models::ReportDraft;
use clearpath_server_models::{
    ApiAqiReading, ApiError, ApiHealth, LocationQuery, ProfileQuery, RecentQuery,
    ReportLocationInput, ReportRequest, ReportResponse,
};
use clearpath_vision::CapturedImage;

use crate::AppState;

/// Largest accepted `POST /api/reports` body. Photos arrive base64-encoded.
pub const MAX_REPORT_BODY_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/zones/traffic`
pub async fn traffic_zones(
    state: web::Data<AppState>,
    query: web::Query<LocationQuery>,
) -> HttpResponse {
    let zones = state.simulator().traffic_zones(query.point());
    HttpResponse::Ok().json(zones)
}

/// `GET /api/zones/pollution`
pub async fn pollution_zones(
    state: web::Data<AppState>,
    query: web::Query<LocationQuery>,
) -> HttpResponse {
    let zones = state.simulator().pollution_zones(query.point());
    HttpResponse::Ok().json(zones)
}

/// `GET /api/aqi`
///
/// Simulated reading for the AQI card.
pub async fn aqi(state: web::Data<AppState>) -> HttpResponse {
    let reading = state.simulator().aqi_reading(Utc::now());
    HttpResponse::Ok().json(ApiAqiReading::from(reading))
}

/// `GET /api/aqi/observed`
///
/// Live reading from the air quality provider.
pub async fn observed_aqi(
    state: web::Data<AppState>,
    query: web::Query<LocationQuery>,
) -> HttpResponse {
    let Some(client) = &state.air_quality else {
        return feed_unavailable("Air quality");
    };

    match client.observe(query.point()).await {
        Ok(reading) => HttpResponse::Ok().json(reading),
        Err(e) => {
            log::error!("Failed to fetch air quality: {e}");
            HttpResponse::BadGateway().json(ApiError::new("Failed to fetch air quality data"))
        }
    }
}

/// `GET /api/traffic/incidents`
pub async fn traffic_incidents(
    state: web::Data<AppState>,
    query: web::Query<LocationQuery>,
) -> HttpResponse {
    let Some(client) = &state.traffic else {
        return feed_unavailable("Traffic incident");
    };

    match client.incidents(query.point()).await {
        Ok(incidents) => HttpResponse::Ok().json(incidents),
        Err(e) => {
            log::error!("Failed to fetch traffic incidents: {e}");
            HttpResponse::BadGateway().json(ApiError::new("Failed to fetch traffic incidents"))
        }
    }
}

/// `GET /api/alerts/{feed}`
pub async fn alerts(path: web::Path<String>) -> HttpResponse {
    let Ok(feed) = path.parse::<AlertFeed>() else {
        return HttpResponse::NotFound().json(ApiError::new(format!(
            "Unknown alert feed {:?}",
            path.as_str()
        )));
    };

    let now = Utc::now();
    match feed {
        AlertFeed::Traffic => HttpResponse::Ok().json(clearpath_feeds::traffic_alerts(now)),
        AlertFeed::Environmental => {
            HttpResponse::Ok().json(clearpath_feeds::environmental_alerts(now))
        }
        AlertFeed::Infrastructure => {
            HttpResponse::Ok().json(clearpath_feeds::infrastructure_updates(now))
        }
    }
}

/// `GET /api/transit`
pub async fn transit() -> HttpResponse {
    HttpResponse::Ok().json(clearpath_feeds::transit_schedule())
}

/// `GET /api/leaderboard`
pub async fn leaderboard(state: web::Data<AppState>) -> HttpResponse {
    match Arc::clone(&state.log).load_all().await {
        Ok(submissions) => HttpResponse::Ok().json(clearpath_reports::leaderboard(&submissions)),
        Err(e) => {
            log::error!("Failed to read submissions: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to load leaderboard"))
        }
    }
}

/// `GET /api/reports/recent`
pub async fn recent_reports(
    state: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    match Arc::clone(&state.log).load_recent(limit).await {
        Ok(submissions) => HttpResponse::Ok().json(submissions),
        Err(e) => {
            log::error!("Failed to read submissions: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to load reports"))
        }
    }
}

/// `GET /api/profile`
pub async fn profile(
    state: web::Data<AppState>,
    query: web::Query<ProfileQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    match Arc::clone(&state.log).load_all().await {
        Ok(submissions) => HttpResponse::Ok().json(clearpath_reports::profile(
            &submissions,
            query.reporter.as_deref(),
            limit,
        )),
        Err(e) => {
            log::error!("Failed to read submissions: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to load profile"))
        }
    }
}

/// `GET /api/rewards`
pub async fn rewards() -> HttpResponse {
    HttpResponse::Ok().json(clearpath_reports::rewards(Utc::now().date_naive()))
}

/// `POST /api/reports`
///
/// Scores the photo against the claimed issue. Accepted reports are saved
/// and answered with 200; rejected or invalid ones with 422.
pub async fn submit_report(
    state: web::Data<AppState>,
    body: web::Json<ReportRequest>,
) -> HttpResponse {
    let Some(service) = &state.reports else {
        return HttpResponse::ServiceUnavailable()
            .json(ApiError::new("Report submission is not configured"));
    };

    let request = body.into_inner();

    let mime_type = request.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE);
    let image = match CapturedImage::from_base64(request.image.trim(), mime_type) {
        Ok(image) => image,
        Err(e) => {
            log::debug!("Rejecting report with undecodable image: {e}");
            return HttpResponse::UnprocessableEntity()
                .json(ApiError::new("The image could not be decoded."));
        }
    };

    let location: Box<dyn LocationProvider> = match request.location {
        Some(ReportLocationInput::Coordinates { lat, lng }) => Box::new(FixedLocation(
            ReportLocation::Coordinates(GeoPoint::new(lat, lng)),
        )),
        Some(ReportLocationInput::Address(address)) if !address.trim().is_empty() => Box::new(
            FixedLocation(ReportLocation::Address(address.trim().to_string())),
        ),
        _ => Box::new(NoLocation),
    };

    let draft = ReportDraft {
        issue_type: request.issue_type,
        description: request.description,
        reporter: request.reporter,
    };

    match service
        .submit(&draft, &StaticCapture(image), location.as_ref())
        .await
    {
        Ok(SubmissionOutcome::Accepted { submission, score }) => {
            HttpResponse::Ok().json(ReportResponse {
                accepted: true,
                confidence: score.confidence,
                matched: score.matched,
                message: format!(
                    "Report submitted. You earned {} points!",
                    submission.points
                ),
                submission: Some(submission),
            })
        }
        Ok(SubmissionOutcome::Rejected { score, message }) => {
            HttpResponse::UnprocessableEntity().json(ReportResponse {
                accepted: false,
                confidence: score.confidence,
                matched: score.matched,
                message,
                submission: None,
            })
        }
        Err(e @ (ReportError::Validation { .. } | ReportError::Device { .. })) => {
            HttpResponse::UnprocessableEntity().json(ApiError::new(e.user_message()))
        }
        Err(e @ ReportError::Recognition(_)) => {
            log::error!("Label detection failed: {e}");
            HttpResponse::BadGateway().json(ApiError::new(e.user_message()))
        }
        Err(e @ ReportError::Storage(_)) => {
            log::error!("Failed to save report: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(e.user_message()))
        }
    }
}

fn feed_unavailable(feed: &str) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiError::new(format!(
        "{feed} feed is not configured"
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use clearpath_reports::{MemoryStore, ReportService, SubmissionLog};
    use clearpath_simulate::Simulator;
    use clearpath_vision::FixedLabels;
    use serde_json::{Value, json};

    use super::*;
    use crate::configure;

    fn state(labels: &[&str]) -> web::Data<AppState> {
        let log = Arc::new(SubmissionLog::new(Box::new(MemoryStore::new())));
        let detector = Arc::new(FixedLabels::new(labels));
        web::Data::new(AppState {
            simulator: Mutex::new(Simulator::seeded(7)),
            log: log.clone(),
            reports: Some(ReportService::new(detector, log)),
            air_quality: None,
            traffic: None,
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(state(&[]));
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn zones_have_fixed_counts() {
        let app = app!(state(&[]));

        let req = test::TestRequest::get()
            .uri("/api/zones/traffic?lat=40.7&lng=-74.0")
            .to_request();
        let traffic: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(traffic.len(), clearpath_simulate::TRAFFIC_ZONE_COUNT);
        assert!(traffic[0]["coordinates"]["latitude"].as_f64().unwrap() > 40.0);

        let req = test::TestRequest::get()
            .uri("/api/zones/pollution")
            .to_request();
        let pollution: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pollution.len(), clearpath_simulate::POLLUTION_ZONE_COUNT);
    }

    #[actix_web::test]
    async fn aqi_includes_band_and_recommendations() {
        let app = app!(state(&[]));
        let req = test::TestRequest::get().uri("/api/aqi").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "real-time");
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
        assert!(body["band"].is_string());
        assert!(body["color"].as_str().unwrap().starts_with('#'));
    }

    #[actix_web::test]
    async fn unconfigured_live_feeds_are_unavailable() {
        let app = app!(state(&[]));

        for uri in ["/api/aqi/observed?lat=1&lng=2", "/api/traffic/incidents"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        }
    }

    #[actix_web::test]
    async fn alert_feeds_by_name() {
        let app = app!(state(&[]));

        let req = test::TestRequest::get()
            .uri("/api/alerts/traffic")
            .to_request();
        let traffic: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(traffic.len(), 6);

        let req = test::TestRequest::get()
            .uri("/api/alerts/infrastructure")
            .to_request();
        let updates: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updates[0]["status"], "in-progress");

        let req = test::TestRequest::get()
            .uri("/api/alerts/weather")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn transit_board() {
        let app = app!(state(&[]));
        let req = test::TestRequest::get().uri("/api/transit").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["buses"][0]["id"], "101");
        assert_eq!(body["metro"][0]["line"], "Blue Line");
    }

    #[actix_web::test]
    async fn accepted_report_shows_in_recent_and_leaderboard() {
        let app = app!(state(&["road", "pothole", "asphalt"]));

        let req = test::TestRequest::post()
            .uri("/api/reports")
            .set_json(json!({
                "issueType": "POTHOLE",
                "image": "AQID",
                "reporter": "Ana",
                "location": { "lat": 51.505, "lng": -0.09 }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["accepted"], true);
        assert_eq!(body["submission"]["points"], 50);
        assert_eq!(body["submission"]["location"], "51.505000, -0.090000");

        let req = test::TestRequest::get()
            .uri("/api/reports/recent?limit=1")
            .to_request();
        let recent: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0]["issueType"], "POTHOLE");

        let req = test::TestRequest::get().uri("/api/leaderboard").to_request();
        let board: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(board[0]["name"], "Ana");
        assert_eq!(board[0]["points"], 50);
        assert_eq!(board[0]["rank"], 1);
    }

    #[actix_web::test]
    async fn profile_totals_follow_accepted_reports() {
        let app = app!(state(&["road", "pothole"]));

        for reporter in ["Ana", "Ben", "Ana"] {
            let req = test::TestRequest::post()
                .uri("/api/reports")
                .set_json(json!({
                    "issueType": "POTHOLE",
                    "image": "AQID",
                    "reporter": reporter
                }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/api/profile?reporter=Ana&limit=1")
            .to_request();
        let ana: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ana["reporter"], "Ana");
        assert_eq!(ana["totalPoints"], 100);
        assert_eq!(ana["reportCount"], 2);
        assert_eq!(ana["recent"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/api/profile").to_request();
        let everyone: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(everyone["reportCount"], 3);
        assert_eq!(everyone["recent"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn rewards_catalog() {
        let app = app!(state(&[]));
        let req = test::TestRequest::get().uri("/api/rewards").to_request();
        let rewards: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(rewards.len(), 2);
        assert_eq!(rewards[0]["title"], "City Cafe Discount");
        assert_eq!(rewards[0]["pointsCost"], 200);
        assert_eq!(rewards[1]["title"], "Bus Pass");
        assert!(rewards[1]["sponsor"]["name"].is_string());
    }

    #[actix_web::test]
    async fn rejected_report_is_unprocessable_and_not_saved() {
        let app = app!(state(&["cat", "sofa"]));

        let req = test::TestRequest::post()
            .uri("/api/reports")
            .set_json(json!({
                "issueType": "STREETLIGHT",
                "image": "AQID",
                "location": "Oak Street"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["accepted"], false);
        assert!(body.get("submission").is_none());

        let req = test::TestRequest::get()
            .uri("/api/reports/recent")
            .to_request();
        let recent: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(recent.is_empty());
    }

    #[actix_web::test]
    async fn other_without_description_is_invalid() {
        let app = app!(state(&["tree"]));

        let req = test::TestRequest::post()
            .uri("/api/reports")
            .set_json(json!({ "issueType": "OTHER", "image": "AQID" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Please describe the issue before submitting.");
    }

    #[actix_web::test]
    async fn undecodable_image_is_invalid() {
        let app = app!(state(&["pothole"]));

        let req = test::TestRequest::post()
            .uri("/api/reports")
            .set_json(json!({ "issueType": "POTHOLE", "image": "not base64!!" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
