use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    chart::{
        entities::{ChartFile, ChartKind, ChartName, GeneratedCharts, RenderedChart},
        ports::{ChartRenderer, ChartService, ChartStore},
    },
    common::{entities::app_errors::CoreError, generate_uuid_v7, services::Service},
    consumption::{
        entities::ConsumptionUpload,
        validators::parse_consumption_upload,
        value_objects::{CategoryTotals, DailySeries},
    },
    forecast::{FORECAST_HORIZON, entities::ForecastSeries, ports::Forecaster},
};

impl<SF, HW, CR, CS> ChartService for Service<SF, HW, CR, CS>
where
    SF: Forecaster,
    HW: Forecaster,
    CR: ChartRenderer,
    CS: ChartStore,
{
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.content.len()))]
    async fn generate_charts(&self, upload: ConsumptionUpload) -> Result<GeneratedCharts, CoreError> {
        let run_id = generate_uuid_v7();

        let seasonal = Arc::clone(&self.seasonal_forecaster);
        let smoothing = Arc::clone(&self.smoothing_forecaster);
        let renderer = Arc::clone(&self.chart_renderer);

        let rendered = tokio::task::spawn_blocking(move || {
            render_run(&upload, seasonal.as_ref(), smoothing.as_ref(), renderer.as_ref())
        })
        .await
        .map_err(|e| CoreError::InternalServerError(format!("render task failed: {e}")))??;

        let mut written: Vec<ChartName> = Vec::with_capacity(rendered.len());
        for chart in rendered {
            let name = ChartName::for_run(run_id, chart.kind);
            match self.chart_store.save(&name, chart.png).await {
                Ok(stored) => debug!(
                    %run_id,
                    chart = %stored.name,
                    size_bytes = stored.size_bytes,
                    checksum = %stored.checksum_sha256,
                    "Chart stored"
                ),
                Err(e) => {
                    warn!(%run_id, chart = %name, error = %e, "Failed to store chart, removing run");
                    self.discard(&written).await;
                    return Err(e);
                }
            }
            written.push(name);
        }

        info!(%run_id, charts = written.len(), "Charts generated");

        let name_of = |kind: ChartKind| ChartName::for_run(run_id, kind).to_string();
        Ok(GeneratedCharts {
            run_id,
            pie_chart: name_of(ChartKind::Pie),
            line_chart: name_of(ChartKind::Line),
            prediction_chart: name_of(ChartKind::Prediction),
        })
    }

    #[instrument(skip(self))]
    async fn get_chart(&self, filename: String) -> Result<ChartFile, CoreError> {
        let name = ChartName::parse(&filename)?;
        let content = self.chart_store.load(&name).await?;

        Ok(ChartFile::new(name, content))
    }

    async fn check_health(&self) -> Result<(), CoreError> {
        self.chart_store.health_check().await
    }
}

impl<SF, HW, CR, CS> Service<SF, HW, CR, CS>
where
    SF: Forecaster,
    HW: Forecaster,
    CR: ChartRenderer,
    CS: ChartStore,
{
    async fn discard(&self, names: &[ChartName]) {
        for name in names {
            if let Err(e) = self.chart_store.remove(name).await {
                warn!(chart = %name, error = %e, "Failed to remove partial run artifact");
            }
        }
    }
}

/// Parse, aggregate, forecast and render a run without touching storage.
/// Every chart is rendered before any of them can be written.
fn render_run<SF, HW, CR>(
    upload: &ConsumptionUpload,
    seasonal: &SF,
    smoothing: &HW,
    renderer: &CR,
) -> Result<Vec<RenderedChart>, CoreError>
where
    SF: Forecaster,
    HW: Forecaster,
    CR: ChartRenderer,
{
    let records = parse_consumption_upload(upload)?;
    let totals = CategoryTotals::from_records(&records);
    let series = DailySeries::from_records(&records)?;

    let forecasts = vec![run_forecast(seasonal, &series)?, run_forecast(smoothing, &series)?];

    let pie = renderer.render_category_share(&totals)?;
    let line = renderer.render_daily_series(&series)?;
    let prediction = renderer.render_forecast(&series, &forecasts)?;

    Ok(vec![
        RenderedChart {
            kind: ChartKind::Pie,
            png: Bytes::from(pie),
        },
        RenderedChart {
            kind: ChartKind::Line,
            png: Bytes::from(line),
        },
        RenderedChart {
            kind: ChartKind::Prediction,
            png: Bytes::from(prediction),
        },
    ])
}

fn run_forecast<F: Forecaster>(
    forecaster: &F,
    series: &DailySeries,
) -> Result<ForecastSeries, CoreError> {
    let method = forecaster.method();
    let forecast = forecaster
        .forecast(series, FORECAST_HORIZON)
        .inspect_err(|e| warn!(%method, error = %e, "Forecast failed"))?;

    debug!(%method, points = forecast.len(), "Forecast ready");
    Ok(forecast)
}
