//! HTTP surface over [`CityInsight`].

use crate::city_insight::CityInsight;
use crate::error::InsightError;
use crate::types::city_profile::CityProfile;
use crate::types::composite::CompositeInsight;
use crate::types::field::{Field, UnavailableKind};
use crate::types::readings::{
    AirQualityReading, EconomicIndicator, EnvironmentProfileStats, VegetationIndexSummary,
    WeatherReading,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub insight: Arc<CityInsight>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub detail: String,
}

/// Maps library errors onto status codes: unknown cities and missing
/// upstream entities are 404, unreachable upstreams are 503.
pub struct ApiError(InsightError);

impl From<InsightError> for ApiError {
    fn from(e: InsightError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            InsightError::CityLookup(_) => (StatusCode::NOT_FOUND, "unknown_city"),
            InsightError::Provider(e) => match e.kind() {
                UnavailableKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
                UnavailableKind::NoData => (StatusCode::NOT_FOUND, "no_data"),
                UnavailableKind::ProviderUnavailable => {
                    (StatusCode::SERVICE_UNAVAILABLE, "provider_unavailable")
                }
            },
            InsightError::Config(_) | InsightError::Generation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        let body = ErrorResponse {
            error,
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn list_cities(State(state): State<AppState>) -> Json<Vec<CityProfile>> {
    Json(state.insight.directory().cities().to_vec())
}

async fn get_insight(State(state): State<AppState>, Path(city): Path<String>) -> ApiResult<CompositeInsight> {
    Ok(Json(state.insight.aggregate(&city).await?))
}

async fn get_weather(State(state): State<AppState>, Path(city): Path<String>) -> ApiResult<WeatherReading> {
    Ok(Json(state.insight.weather(&city).await?))
}

async fn get_air_quality(State(state): State<AppState>, Path(city): Path<String>) -> ApiResult<AirQualityReading> {
    Ok(Json(state.insight.air_quality(&city).await?))
}

async fn get_vegetation(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<VegetationIndexSummary> {
    Ok(Json(state.insight.vegetation(&city).await?))
}

async fn get_environment(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<EnvironmentProfileStats> {
    Ok(Json(state.insight.environment_profile(&city).await?))
}

async fn get_indicators(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<BTreeMap<String, Field<EconomicIndicator>>> {
    Ok(Json(state.insight.indicators(&city).await?))
}

pub fn create_router(insight: Arc<CityInsight>) -> Router {
    let state = AppState { insight };

    Router::new()
        .route("/health", get(health_check))
        .route("/cities", get(list_cities))
        .route("/cities/{city}/insight", get(get_insight))
        .route("/cities/{city}/weather", get(get_weather))
        .route("/cities/{city}/air-quality", get(get_air_quality))
        .route("/cities/{city}/vegetation", get(get_vegetation))
        .route("/cities/{city}/environment", get(get_environment))
        .route("/cities/{city}/indicators", get(get_indicators))
        .with_state(state)
}

/// Serves the API on `bind` until Ctrl-C.
pub async fn run_server(insight: Arc<CityInsight>, bind: &str) -> std::io::Result<()> {
    let app = create_router(insight);

    let listener = TcpListener::bind(bind).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::error::ProviderError;
    use crate::test_support::{serve_router, FakeIndicators, FakeSource};
    use chrono::Utc;
    use serde_json::{json, Value};

    async fn serve() -> Result<String, Box<dyn std::error::Error>> {
        let indicators = FakeIndicators::default().with(
            "SP.POP.TOTL",
            json!([{"page": 1}, [{"value": 51_712_619.0, "date": "2023"}]]),
        );
        let insight = CityInsight::builder()
            .weather(Arc::new(FakeSource::ok(
                "weather",
                WeatherReading {
                    temperature_celsius: Some(18.5),
                    humidity_percent: Some(60),
                    condition: Some("clear sky".to_string()),
                    wind_speed_mps: None,
                    observed_at: Utc::now(),
                },
            )))
            .air_quality(Arc::new(FakeSource::<AirQualityReading>::failing("air_quality", || {
                ProviderError::not_configured("air_quality", "OPENWEATHER_API_KEY is not set")
            })))
            .vegetation(Arc::new(FakeSource::<VegetationIndexSummary>::failing("vegetation", || {
                ProviderError::NotFound {
                    what: "administrative region 'Cheju-do'".to_string(),
                }
            })))
            .environment(Arc::new(FakeSource::ok(
                "environment_profile",
                EnvironmentProfileStats {
                    avg_canopy_height_m: Some(9.4),
                    avg_canopy_openness_pct: Some(48.0),
                    urban_area_pct: Some(21.5),
                    sample_count: 1204,
                },
            )))
            .indicator_source(Arc::new(indicators))
            .build();
        Ok(serve_router(create_router(Arc::new(insight))).await?)
    }

    async fn get_json(url: String) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        let response = reqwest::get(url).await?;
        let status = StatusCode::from_u16(response.status().as_u16())?;
        Ok((status, response.json().await?))
    }

    #[tokio::test]
    async fn test_health_and_city_list() -> Result<(), Box<dyn std::error::Error>> {
        let base = serve().await?;

        let (status, body) = get_json(format!("{base}/health")).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));

        let (status, body) = get_json(format!("{base}/cities")).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(5));
        Ok(())
    }

    #[tokio::test]
    async fn test_insight_is_ok_with_degraded_fields() -> Result<(), Box<dyn std::error::Error>> {
        let base = serve().await?;

        let (status, body) = get_json(format!("{base}/cities/jeju-si/insight")).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"]["id"], "jeju");
        assert_eq!(body["weather"]["status"], "available");
        assert_eq!(body["weather"]["data"]["humidity_percent"], 60);
        assert_eq!(body["air_quality"]["kind"], "provider_unavailable");
        assert_eq!(body["vegetation"]["kind"], "not_found");
        assert_eq!(body["indicators"]["population"]["data"]["as_of_year"], "2023");
        assert_eq!(body["narrative"], crate::summarizer::adapter::FALLBACK_NARRATIVE);
        Ok(())
    }

    #[tokio::test]
    async fn test_error_statuses() -> Result<(), Box<dyn std::error::Error>> {
        let base = serve().await?;

        let (status, body) = get_json(format!("{base}/cities/atlantis/insight")).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown_city");

        let (status, body) = get_json(format!("{base}/cities/jeju/air-quality")).await?;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "provider_unavailable");
        assert!(body["detail"].as_str().is_some_and(|d| d.contains("OPENWEATHER_API_KEY")));

        let (status, body) = get_json(format!("{base}/cities/jeju/vegetation")).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        let (status, body) = get_json(format!("{base}/cities/Seoul/environment")).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sample_count"], 1204);
        Ok(())
    }
}
