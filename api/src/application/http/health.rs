use axum::{Router, extract::State, routing::get};
use foodcast_core::domain::chart::ports::ChartService;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{OpenApi, ToSchema};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    summary = "Liveness check",
    responses((status = 200, body = HealthStatus))
)]
pub async fn live() -> Response<HealthStatus> {
    Response::OK(HealthStatus::ok())
}

#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    summary = "Readiness check on the chart output directory",
    responses(
        (status = 200, body = HealthStatus),
        (status = 503, description = "Chart output directory unavailable")
    )
)]
pub async fn ready(State(state): State<AppState>) -> Result<Response<HealthStatus>, ApiError> {
    state.service.check_health().await.map_err(|e| {
        warn!(error = %e, "Readiness check failed");
        ApiError::ServiceUnavailable("chart storage unavailable".to_string())
    })?;

    Ok(Response::OK(HealthStatus::ok()))
}

#[derive(OpenApi)]
#[openapi(paths(live, ready))]
pub struct HealthApiDoc;

pub fn health_routes(root_path: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{root_path}/health/live"), get(live))
        .route(&format!("{root_path}/health/ready"), get(ready))
}
