use utoipa::OpenApi;

use crate::application::http::{chart::router::ChartApiDoc, health::HealthApiDoc};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foodcast API",
        description = "Daily food consumption charts with SARIMA and Holt-Winters forecasts"
    ),
    nest(
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;

/// Complete document: chart routes sit at the root, health under `/health`
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.merge(ChartApiDoc::openapi());
    openapi
}
