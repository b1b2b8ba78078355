use axum::{
    extract::State,
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, ETAG},
    },
    response::{IntoResponse, Response as AxumResponse},
};
use axum_extra::{
    TypedHeader,
    headers::{ETag, IfNoneMatch},
};
use foodcast_core::domain::chart::ports::ChartService;
use tracing::debug;

use crate::application::http::{
    chart::validators::DownloadChartQuery,
    server::{
        api_entities::api_error::{ApiError, ValidateQuery},
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/download-graph/",
    tag = "charts",
    summary = "Download a generated chart",
    params(DownloadChartQuery),
    responses(
        (status = 200, description = "PNG image", content_type = "image/png", body = Vec<u8>),
        (status = 304, description = "Client copy is current"),
        (status = 400, description = "Invalid file name"),
        (status = 404, description = "Chart not found")
    )
)]
pub async fn download_chart(
    State(state): State<AppState>,
    if_none_match: Option<TypedHeader<IfNoneMatch>>,
    ValidateQuery(query): ValidateQuery<DownloadChartQuery>,
) -> Result<AxumResponse, ApiError> {
    let chart = state.service.get_chart(query.filename).await?;
    let etag = format!("\"{}\"", chart.checksum_sha256);

    if let (Some(TypedHeader(if_none_match)), Ok(current)) =
        (if_none_match, etag.parse::<ETag>())
    {
        if !if_none_match.precondition_passes(&current) {
            debug!(chart = %chart.name, "Chart not modified");
            return Ok((StatusCode::NOT_MODIFIED, [(ETAG, etag)]).into_response());
        }
    }

    let disposition = format!("inline; filename=\"{}\"", chart.name);

    Ok((
        [
            (CONTENT_TYPE, chart.content_type.to_string()),
            (ETAG, etag),
            (CONTENT_DISPOSITION, disposition),
            (CACHE_CONTROL, "no-cache".to_string()),
        ],
        chart.content,
    )
        .into_response())
}
