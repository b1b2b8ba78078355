use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::{
    download_chart::{__path_download_chart, download_chart},
    generate_charts::{__path_generate_charts, generate_charts},
};

#[derive(OpenApi)]
#[openapi(paths(generate_charts, download_chart))]
pub struct ChartApiDoc;

pub fn chart_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{root_path}/generate-graphs/"),
            post(generate_charts),
        )
        .route(&format!("{root_path}/generate-graphs"), post(generate_charts))
        .route(&format!("{root_path}/download-graph/"), get(download_chart))
        .route(&format!("{root_path}/download-graph"), get(download_chart))
        .layer(DefaultBodyLimit::max(state.args.server.max_upload_bytes))
}
