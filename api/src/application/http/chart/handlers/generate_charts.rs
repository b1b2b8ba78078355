use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use foodcast_core::domain::{
    chart::{entities::GeneratedCharts, ports::ChartService},
    consumption::entities::ConsumptionUpload,
};
use tracing::{info, warn};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

/// Multipart field carrying the CSV file
const FILE_FIELD: &str = "file";

#[utoipa::path(
    post,
    path = "/generate-graphs/",
    tag = "charts",
    summary = "Generate charts and forecasts from a consumption CSV",
    description = "Validates the uploaded CSV (columns `Fecha`, `Tipo de Alimento`, `Cantidad Consumida (gr)`), reindexes it to a daily calendar, fits the SARIMA and Holt-Winters forecasts and stores three PNG charts. The returned names are accepted by the download endpoint.",
    request_body(content_type = "multipart/form-data", description = "Form with a `file` part holding the CSV upload"),
    responses(
        (status = 200, description = "Charts generated", body = GeneratedCharts),
        (status = 400, description = "Invalid upload"),
        (status = 413, description = "Upload too large"),
        (status = 422, description = "Forecast models could not be fitted"),
        (status = 500, description = "Rendering or storage failure")
    )
)]
pub async fn generate_charts(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<GeneratedCharts>, ApiError> {
    let mut upload: Option<ConsumptionUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("missing filename in 'file' field".to_string()))?;
        let content = field.bytes().await.map_err(multipart_error)?;

        upload = Some(ConsumptionUpload::new(filename, content));
    }

    let upload = upload.ok_or_else(|| {
        ApiError::BadRequest("missing 'file' field in multipart form".to_string())
    })?;
    let filename = upload.filename.clone();

    let generated = state.service.generate_charts(upload).await.map_err(|e| {
        warn!(filename = %filename, error = %e, "Chart generation rejected");
        ApiError::from(e)
    })?;

    info!(run_id = %generated.run_id, filename = %filename, "Chart generation completed");

    Ok(Response::OK(generated))
}

fn multipart_error(error: MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(error.body_text())
    } else {
        ApiError::BadRequest(format!("failed to read multipart form: {}", error.body_text()))
    }
}
