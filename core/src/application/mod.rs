use tracing::info;

use crate::{
    domain::common::{FoodcastConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::{
        chart::plotters_renderer::PlottersChartRenderer,
        chart_store::local::LocalChartStore,
        forecast::{holt_winters::HoltWintersForecaster, sarima::SarimaForecaster},
    },
};

pub type FoodcastService =
    Service<SarimaForecaster, HoltWintersForecaster, PlottersChartRenderer, LocalChartStore>;

pub async fn create_service(config: FoodcastConfig) -> Result<FoodcastService, CoreError> {
    let chart_store = LocalChartStore::new(&config.storage.output_dir).await?;
    let chart_renderer = PlottersChartRenderer::new(&config.chart)?;

    info!(
        output_dir = %config.storage.output_dir.display(),
        "Chart store ready"
    );

    Ok(Service::new(
        SarimaForecaster::default(),
        HoltWintersForecaster::default(),
        chart_renderer,
        chart_store,
    ))
}
